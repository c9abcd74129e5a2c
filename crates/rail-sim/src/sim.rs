//! The `Sim` struct and its tick loop.

use log::{debug, info};

use rail_core::{OperationId, PlacedTrainId, SimClock, SimConfig, SimTime, TrackId};
use rail_network::TrackNetwork;
use rail_timetable::{Timetable, TimetableIndex};

use crate::engine::{DiagnosticLog, Engine, Outcome};
use crate::{
    Diagnostic, OperatingStatus, PlacedTrain, RoutingMode, SimError, SimObserver, SimResult,
    StationStatus, TrainPosition,
};

/// Colour given to hand-placed trains.
const FREE_TRAIN_COLOR: &str = "#808080";

/// The main simulation runner.
///
/// Each tick:
///
/// 1. **Spawn**: every operation whose validity window contains `now` and
///    which has not run yet gets a placed train for its first train: at
///    its first stop if that is already due, else at the start of its start
///    track.  An entry track already occupied defers the spawn.
/// 2. **Update**: every placed train, in placement order, with the same
///    `now`.
/// 3. **Advance** the clock by one fixed step.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    pub config: SimConfig,

    pub clock: SimClock,

    /// Read-only for the whole run.
    pub network: TrackNetwork,

    /// Normalized timetable.  Read-only for the whole run.
    pub timetable: Timetable,

    pub index: TimetableIndex,

    pub(crate) trains:  Vec<PlacedTrain>,
    /// Indexed like `timetable.operations`.
    pub(crate) spawned: Vec<bool>,
    pub(crate) next_id: u32,
    pub(crate) log:     DiagnosticLog,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current time through `config.end_time`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        info!(
            "running {} operations from {} to {} ({} s/tick)",
            self.timetable.operations.len(),
            self.clock.now,
            self.config.end_time,
            self.config.time_step_secs,
        );
        while self.clock.now <= self.config.end_time {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.now);
        info!(
            "finished after {} ticks: {} trains placed, {} diagnostics",
            self.clock.ticks,
            self.trains.len(),
            self.log.entries.len(),
        );
    }

    /// Run exactly `n` ticks from the current time (ignores `end_time`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    /// Trains currently on the network, in placement order.
    pub fn placed_trains(&self) -> &[PlacedTrain] {
        &self.trains
    }

    pub fn placed_train(&self, id: PlacedTrainId) -> Option<&PlacedTrain> {
        self.trains.iter().find(|t| t.id == id)
    }

    /// Display position of every placed train.
    pub fn positions(&self) -> Vec<TrainPosition> {
        self.trains
            .iter()
            .map(|t| TrainPosition {
                train_id:     t.id,
                train:        t.train,
                position:     t.position,
                display_name: t.name.clone(),
                color:        t.color.clone(),
            })
            .collect()
    }

    /// Problems recorded so far: missing branch commands and movement faults.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.log.entries
    }

    /// `true` once `op` has had a placed train.
    pub fn is_spawned(&self, op: OperationId) -> bool {
        self.timetable
            .operations
            .iter()
            .position(|o| o.id == op)
            .is_some_and(|i| self.spawned[i])
    }

    /// Put an out-of-service train at the start of `track`.  It runs at the
    /// default speed, goes straight at every branch and never stops.
    pub fn place_free_train(&mut self, track: TrackId, name: impl Into<String>) -> SimResult<PlacedTrainId> {
        let begin = self
            .network
            .try_track(track)
            .map_err(|_| SimError::UnknownTrack(track))?
            .begin;
        let id = self.alloc_id();
        self.trains.push(PlacedTrain {
            id,
            operation:        None,
            train:            None,
            op_position:      0,
            name:             name.into(),
            color:            FREE_TRAIN_COLOR.to_string(),
            track,
            position:         begin,
            speed:            self.config.default_speed,
            station_status:   StationStatus::Running,
            operating_status: OperatingStatus::OutOfService,
            just_departed:    None,
            next_dia:         0,
            routing:          RoutingMode::Free,
            fault:            None,
            degraded:         false,
        });
        debug!("placed free train {id} on {track}");
        Ok(id)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.now;
        observer.on_tick_start(now);

        self.spawn_due(now);
        let moving = self.update_trains(now);

        observer.on_tick_end(now, moving);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && self.clock.ticks.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.positions());
        }

        self.clock.advance();
    }

    fn alloc_id(&mut self) -> PlacedTrainId {
        let id = PlacedTrainId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_due(&mut self, now: SimTime) {
        for i in 0..self.timetable.operations.len() {
            if self.spawned[i] {
                continue;
            }
            let op = &self.timetable.operations[i];
            let Some((start, end)) = self.timetable.operation_window(op) else { continue };
            if now < start || now > end {
                continue;
            }
            let Some(train) = op.trains.first().and_then(|&id| self.timetable.train(id)) else {
                continue;
            };
            let engine = Engine {
                network:   &self.network,
                timetable: &self.timetable,
                index:     &self.index,
                config:    &self.config,
            };
            let entry = engine.origin(train, now).track;
            if self.trains.iter().any(|t| t.track == entry) {
                debug!("{} waits: {entry} is occupied", op.id);
                continue;
            }

            let id = PlacedTrainId(self.next_id);
            let placed = engine.board(id, op.id, 0, train, now);
            debug!("{} spawned {id} as {} on {}", op.id, train.id, placed.track);

            self.next_id += 1;
            self.trains.push(placed);
            self.spawned[i] = true;
        }
    }

    /// Update every train; returns how many are moving afterwards.
    fn update_trains(&mut self, now: SimTime) -> usize {
        let engine = Engine {
            network:   &self.network,
            timetable: &self.timetable,
            index:     &self.index,
            config:    &self.config,
        };
        let log = &mut self.log;
        self.trains
            .retain_mut(|t| engine.update(t, now, log) == Outcome::Keep);
        self.trains.iter().filter(|t| t.is_moving()).count()
    }
}
