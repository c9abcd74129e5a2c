//! Timetable data types.
//!
//! Trains and stations are stored in flat `Vec`s indexed by their ids
//! (`trains[i].id == TrainId(i)`), checked by [`Timetable::validate`].  The
//! order of `stations` is the line order used for interpolation.

use rail_core::{OperationId, PlatformId, SimTime, StationId, SwitchId, TrackId, TrainId};
use rail_network::BranchCommand;

use crate::{TimetableError, TimetableResult};

// ── Station ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id:        StationId,
    pub name:      String,
    /// Line kilometrage, in any monotone unit.
    pub distance:  f64,
    /// Platforms of this station; the first is the default for passing
    /// entries synthesized by interpolation.
    pub platforms: Vec<PlatformId>,
}

// ── DiaTime ───────────────────────────────────────────────────────────────────

/// One station visit of a train.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiaTime {
    pub station:      StationId,
    pub platform:     PlatformId,
    pub arrival:      Option<SimTime>,
    pub departure:    Option<SimTime>,
    /// The train runs through without stopping.
    pub is_passing:   bool,
    /// Synthesized by [`interpolate`](crate::interpolate).
    pub interpolated: bool,
}

impl DiaTime {
    /// A scheduled stop.
    pub fn stop(
        station:   StationId,
        platform:  PlatformId,
        arrival:   Option<SimTime>,
        departure: Option<SimTime>,
    ) -> Self {
        Self { station, platform, arrival, departure, is_passing: false, interpolated: false }
    }

    /// A scheduled pass-through at `time`.
    pub fn passing(station: StationId, platform: PlatformId, time: SimTime) -> Self {
        Self {
            station,
            platform,
            arrival:      Some(time),
            departure:    Some(time),
            is_passing:   true,
            interpolated: false,
        }
    }

    /// Closed occupancy interval `[arrival, departure]`.  A missing end
    /// falls back to the other; `None` if neither is known.
    pub fn interval(&self) -> Option<(SimTime, SimTime)> {
        match (self.arrival, self.departure) {
            (Some(a), Some(d)) => Some((a.min(d), a.max(d))),
            (Some(t), None) | (None, Some(t)) => Some((t, t)),
            (None, None) => None,
        }
    }

    /// Time this visit is left behind: departure, else arrival.
    #[inline]
    pub fn leaving_time(&self) -> Option<SimTime> {
        self.departure.or(self.arrival)
    }

    /// Time this visit is reached: arrival, else departure.
    #[inline]
    pub fn reaching_time(&self) -> Option<SimTime> {
        self.arrival.or(self.departure)
    }
}

// ── Train ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Train {
    pub id:          TrainId,
    pub name:        String,
    /// Display colour, e.g. `"#d03030"`.
    pub color:       String,
    /// Track the train is placed on when its operation spawns it.
    pub start_track: TrackId,
    pub dia_times:   Vec<DiaTime>,
}

impl Train {
    pub fn new(id: TrainId, name: impl Into<String>, start_track: TrackId) -> Self {
        Self {
            id,
            name: name.into(),
            color: String::from("#000000"),
            start_track,
            dia_times: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_dia_times(mut self, dia_times: Vec<DiaTime>) -> Self {
        self.dia_times = dia_times;
        self
    }

    /// Earliest known time in the schedule.
    pub fn first_time(&self) -> Option<SimTime> {
        self.dia_times.iter().find_map(DiaTime::reaching_time)
    }

    /// Latest known time in the schedule.
    pub fn last_time(&self) -> Option<SimTime> {
        self.dia_times.iter().rev().find_map(DiaTime::leaving_time)
    }

    /// Index of the first non-passing entry at or after `from`.
    pub fn next_stop_from(&self, from: usize) -> Option<usize> {
        self.dia_times
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, d)| !d.is_passing)
            .map(|(i, _)| i)
    }
}

// ── Operation ─────────────────────────────────────────────────────────────────

/// A sequence of trains run back to back by one physical consist.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation {
    pub id:     OperationId,
    pub trains: Vec<TrainId>,
    /// Explicit validity window; derived from the trains when `None`.
    pub window: Option<(SimTime, SimTime)>,
}

impl Operation {
    pub fn new(id: OperationId, trains: Vec<TrainId>) -> Self {
        Self { id, trains, window: None }
    }

    pub fn with_window(mut self, start: SimTime, end: SimTime) -> Self {
        self.window = Some((start, end));
        self
    }
}

// ── Branch commands ───────────────────────────────────────────────────────────

/// "When `train` reaches `switch`, take `command`."
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchEntry {
    pub train:   TrainId,
    pub switch:  SwitchId,
    pub command: BranchCommand,
}

// ── Timetable ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable {
    /// In line order.
    pub stations:        Vec<Station>,
    /// Indexed by `TrainId`.
    pub trains:          Vec<Train>,
    pub operations:      Vec<Operation>,
    pub branch_commands: Vec<BranchEntry>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn train(&self, id: TrainId) -> Option<&Train> {
        self.trains.get(id.index())
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Record a branch command, replacing an earlier one for the same
    /// train and switch.
    pub fn set_branch_command(&mut self, train: TrainId, switch: SwitchId, command: BranchCommand) {
        match self
            .branch_commands
            .iter_mut()
            .find(|e| e.train == train && e.switch == switch)
        {
            Some(e) => e.command = command,
            None => self.branch_commands.push(BranchEntry { train, switch, command }),
        }
    }

    /// Validity window of `op`: the explicit one if set, otherwise first
    /// train's first time to last train's last time.  `None` if the
    /// operation has no timed entries.
    pub fn operation_window(&self, op: &Operation) -> Option<(SimTime, SimTime)> {
        if op.window.is_some() {
            return op.window;
        }
        let start = op
            .trains
            .iter()
            .filter_map(|&t| self.train(t))
            .find_map(Train::first_time)?;
        let end = op
            .trains
            .iter()
            .rev()
            .filter_map(|&t| self.train(t))
            .find_map(Train::last_time)?;
        Some((start, end.max(start)))
    }

    /// Check that ids match positions and every reference resolves.
    pub fn validate(&self) -> TimetableResult<()> {
        for (i, t) in self.trains.iter().enumerate() {
            if t.id.index() != i {
                return Err(TimetableError::IdMismatch { what: "train", position: i, id: t.id.0 });
            }
            for d in &t.dia_times {
                if self.station(d.station).is_none() {
                    return Err(TimetableError::UnknownStation(d.station));
                }
            }
        }
        for op in &self.operations {
            if op.trains.is_empty() {
                return Err(TimetableError::EmptyOperation(op.id));
            }
            if let Some(&missing) = op.trains.iter().find(|&&t| self.train(t).is_none()) {
                return Err(TimetableError::UnknownTrain(missing));
            }
        }
        if let Some(e) = self.branch_commands.iter().find(|e| self.train(e.train).is_none()) {
            return Err(TimetableError::UnknownTrain(e.train));
        }
        Ok(())
    }
}
