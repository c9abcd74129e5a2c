//! Simulation time model.
//!
//! # Design
//!
//! Global time is a `SimTime`: whole seconds since midnight of the service
//! day (values past 24:00 are allowed for overnight services).  Timetable
//! entries use the same unit, so "has the departure time been reached" is a
//! plain integer comparison.
//!
//! The clock advances by a fixed `time_step_secs` per tick.  Train speeds are
//! layout units *per tick*; changing the step therefore changes how far a
//! train moves each tick, which is why schedule speed derivation multiplies
//! by the step.

use std::fmt;
use std::str::FromStr;

use crate::RailError;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// Seconds since the start of the service day.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub i64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub const fn from_hms(h: i64, m: i64, s: i64) -> Self {
        SimTime(h * 3_600 + m * 60 + s)
    }

    #[inline]
    pub fn secs(self) -> i64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: SimTime) -> i64 {
        self.0 - earlier.0
    }

    /// `(hours, minutes, seconds)` components.  Hours may exceed 23.
    pub fn hms(self) -> (i64, i64, i64) {
        let total = self.0.max(0);
        (total / 3_600, (total % 3_600) / 60, total % 60)
    }
}

impl std::ops::Add<i64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: i64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = i64;
    #[inline]
    fn sub(self, rhs: SimTime) -> i64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// Parses `HH:MM`, `HH:MM:SS`, or a bare number of seconds.
impl FromStr for SimTime {
    type Err = RailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || RailError::Parse(format!("invalid time {s:?}: expected HH:MM[:SS] or seconds"));

        if !s.contains(':') {
            return s.parse::<i64>().map(SimTime).map_err(|_| bad());
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(bad());
        }
        let mut fields = [0i64; 3];
        for (slot, part) in fields.iter_mut().zip(&parts) {
            *slot = part.parse::<i64>().map_err(|_| bad())?;
        }
        let [h, m, sec] = fields;
        if !(0..60).contains(&m) || !(0..60).contains(&sec) || h < 0 {
            return Err(bad());
        }
        Ok(SimTime::from_hms(h, m, sec))
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current global time and the number of ticks taken.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Global time at tick 0.
    pub start: SimTime,
    /// How many simulated seconds one tick represents.
    pub time_step_secs: u32,
    /// The current global time, advanced by `SimClock::advance()` each tick.
    pub now: SimTime,
    /// Number of ticks taken since `start`.
    pub ticks: u64,
}

impl SimClock {
    pub fn new(start: SimTime, time_step_secs: u32) -> Self {
        Self { start, time_step_secs, now: start, ticks: 0 }
    }

    /// Advance the clock by one fixed step.
    #[inline]
    pub fn advance(&mut self) {
        self.now = self.now + self.time_step_secs as i64;
        self.ticks += 1;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {} ({})", self.ticks, self.now)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// How a departing train picks its speed.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedMode {
    /// Every train runs at `SimConfig::default_speed`.
    #[default]
    Fixed,
    /// On each departure the speed is derived from the distance to the next
    /// stop and the time left until its scheduled arrival.
    Schedule,
}

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Global time at tick 0.
    pub start_time: SimTime,

    /// `Sim::run` stops once global time passes this value.
    pub end_time: SimTime,

    /// Seconds of simulated time per tick.  Must be > 0.
    pub time_step_secs: u32,

    /// Emit a position snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    /// Speed policy for departing trains.
    pub speed_mode: SpeedMode,

    /// Speed (layout units per tick) for newly placed trains and for
    /// `SpeedMode::Fixed`.
    pub default_speed: f64,

    /// Lower clamp for schedule-derived speeds.  Must be > 0.
    pub min_speed: f64,

    /// Upper clamp for schedule-derived speeds.
    pub max_speed: f64,

    /// Seconds subtracted from a scheduled arrival when deriving speed, so
    /// trains arrive slightly early rather than late.
    pub arrival_margin_secs: i64,
}

impl SimConfig {
    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_time, self.time_step_secs)
    }

    /// Number of ticks between `start_time` and `end_time` (inclusive of the
    /// tick at `end_time`).
    pub fn total_ticks(&self) -> u64 {
        let span = self.end_time.since(self.start_time).max(0) as u64;
        span / self.time_step_secs.max(1) as u64 + 1
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time:            SimTime::ZERO,
            end_time:              SimTime::from_hms(24, 0, 0),
            time_step_secs:        1,
            output_interval_ticks: 1,
            speed_mode:            SpeedMode::Fixed,
            default_speed:         10.0,
            min_speed:             0.5,
            max_speed:             100.0,
            arrival_margin_secs:   0,
        }
    }
}
