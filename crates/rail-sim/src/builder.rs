//! Fluent builder for constructing a [`Sim`].

use log::debug;

use rail_core::SimConfig;
use rail_network::TrackNetwork;
use rail_timetable::{Timetable, TimetableIndex};

use crate::engine::DiagnosticLog;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: start/end time, step, speed policy
/// - [`TrackNetwork`]: from [`rail_network::TrackNetworkBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                     |
/// |-------------------|---------------------------------------------|
/// | `.timetable(tt)`  | Empty timetable: only free trains will run  |
///
/// The timetable should already have been through
/// [`rail_timetable::normalize`].
///
/// # Example
///
/// ```rust,ignore
/// let (timetable, report) = rail_timetable::normalize(raw);
/// let mut sim = SimBuilder::new(config, network)
///     .timetable(timetable)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    network:   TrackNetwork,
    timetable: Option<Timetable>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, network: TrackNetwork) -> Self {
        Self { config, network, timetable: None }
    }

    pub fn timetable(mut self, timetable: Timetable) -> Self {
        self.timetable = Some(timetable);
        self
    }

    /// Validate inputs, build the timetable index, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        validate_config(&self.config)?;
        self.network.validate()?;

        let timetable = self.timetable.unwrap_or_default();
        timetable.validate()?;
        for train in &timetable.trains {
            if self.network.try_track(train.start_track).is_err() {
                return Err(SimError::BadStartTrack { train: train.id, track: train.start_track });
            }
        }

        let index = TimetableIndex::build(&timetable);
        debug!(
            "indexed {} trains, {} branch commands",
            timetable.trains.len(),
            index.branch_command_count(),
        );

        Ok(Sim {
            clock:     self.config.make_clock(),
            config:    self.config,
            network:   self.network,
            spawned:   vec![false; timetable.operations.len()],
            timetable,
            index,
            trains:    Vec::new(),
            next_id:   0,
            log:       DiagnosticLog::default(),
        })
    }
}

fn validate_config(c: &SimConfig) -> SimResult<()> {
    if c.time_step_secs == 0 {
        return Err(SimError::Config("time_step_secs must be > 0".into()));
    }
    if c.end_time < c.start_time {
        return Err(SimError::Config(format!("end_time {} is before start_time {}", c.end_time, c.start_time)));
    }
    if c.min_speed.is_nan() || c.min_speed <= 0.0 || c.max_speed < c.min_speed {
        return Err(SimError::Config(format!(
            "speed range [{}, {}] is invalid",
            c.min_speed, c.max_speed
        )));
    }
    if c.default_speed.is_nan() || c.default_speed < 0.0 {
        return Err(SimError::Config(format!("default_speed {} must be >= 0", c.default_speed)));
    }
    Ok(())
}
