//! Per-train update: the station state machine and movement along tracks.
//!
//! ```text
//!            crosses stop point of its next stop
//!   Running ──────────────────────────────────────▶ Arrived
//!      ▲                                               │
//!      └───────────── now >= departure ────────────────┘
//!
//!   Arrived, no departure  → next train of the operation, else Parking
//!   Departed, no stop left → next train of the operation, else removed
//! ```
//!
//! A train that cannot find its next track keeps the position it had at the
//! start of the tick and carries a [`MovementFault`] until it can move again.

use log::{debug, warn};
use rustc_hash::FxHashSet;

use rail_core::{OperationId, PlacedTrainId, PlatformId, Point, SimConfig, SimTime, SpeedMode, SwitchId, TrackId, TrainId};
use rail_network::{BranchCommand, Track, TrackNetwork};
use rail_timetable::{Timetable, TimetableIndex, Train};

use crate::{Diagnostic, MovementFault, OperatingStatus, PlacedTrain, RoutingMode, StationStatus};

/// Slack on stop-point crossings so floating-point drift cannot skip a stop.
const STOP_EPS: f64 = 1e-9;

// ── Diagnostics ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    pub(crate) entries: Vec<Diagnostic>,
    missing_seen:       FxHashSet<(TrainId, SwitchId)>,
}

impl DiagnosticLog {
    fn missing_entry(&mut self, train: TrainId, switch: SwitchId, at: SimTime) {
        if self.missing_seen.insert((train, switch)) {
            warn!("{train} has no branch command at {switch}; routing toward its next stop");
            self.entries.push(Diagnostic::MissingTimetableEntry { train, switch, at });
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// What the caller should do with a train after updating it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Keep,
    Remove,
}

enum Dwell {
    Hold,
    Departed,
    /// No departure time: the train ends its run here.
    Terminated,
}

/// Entry point of a train onto the network.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Origin {
    pub(crate) track:    TrackId,
    pub(crate) position: Point,
    /// Set when the train starts standing at this dia-time entry.
    pub(crate) stop:     Option<usize>,
}

/// Read-only view of everything a train update consults.
pub(crate) struct Engine<'a> {
    pub(crate) network:   &'a TrackNetwork,
    pub(crate) timetable: &'a Timetable,
    pub(crate) index:     &'a TimetableIndex,
    pub(crate) config:    &'a SimConfig,
}

impl Engine<'_> {
    /// Where `train` enters the network at `now`.
    ///
    /// A train whose first stop is already due starts standing at that
    /// stop's stop point, on `start_track` when it carries the platform.
    /// Otherwise it starts at the beginning of `start_track` and runs there.
    pub(crate) fn origin(&self, train: &Train, now: SimTime) -> Origin {
        let start = Origin {
            track:    train.start_track,
            position: self.network.track(train.start_track).begin,
            stop:     None,
        };
        let Some(k) = train.next_stop_from(0) else { return start };
        let dia = &train.dia_times[k];
        if dia.reaching_time().is_none_or(|due| now < due) {
            return start;
        }
        let track = if self.network.track(train.start_track).platform == Some(dia.platform) {
            Some(train.start_track)
        } else {
            self.network.tracks_with_platform(dia.platform).into_iter().next()
        };
        match track {
            Some(track) => Origin { track, position: self.network.track(track).stop_point(), stop: Some(k) },
            None => start,
        }
    }

    /// A placed train for `train`, entering at its [`origin`](Self::origin).
    pub(crate) fn board(
        &self,
        id:          PlacedTrainId,
        operation:   OperationId,
        op_position: usize,
        train:       &Train,
        now:         SimTime,
    ) -> PlacedTrain {
        let origin = self.origin(train, now);
        let mut placed = PlacedTrain {
            id,
            operation:        Some(operation),
            train:            Some(train.id),
            op_position,
            name:             train.name.clone(),
            color:            train.color.clone(),
            track:            origin.track,
            position:         origin.position,
            speed:            self.config.default_speed,
            station_status:   StationStatus::Running,
            operating_status: OperatingStatus::InService,
            just_departed:    None,
            next_dia:         0,
            routing:          RoutingMode::Scheduled,
            fault:            None,
            degraded:         false,
        };
        match origin.stop {
            Some(k) => {
                debug!("{id} boards {} standing at {}", train.id, train.dia_times[k].platform);
                placed.station_status = StationStatus::Arrived;
                placed.next_dia = k;
            }
            None => placed.speed = self.speed_to_next_stop(&placed, train, now),
        }
        placed
    }

    /// Advance one train by one tick.
    pub(crate) fn update(&self, t: &mut PlacedTrain, now: SimTime, log: &mut DiagnosticLog) -> Outcome {
        if t.operating_status == OperatingStatus::Parking {
            return Outcome::Keep;
        }

        if t.station_status == StationStatus::Arrived {
            match self.dwell(t, now) {
                Dwell::Hold => return Outcome::Keep,
                Dwell::Terminated => {
                    if !self.reassign(t, now) {
                        debug!("{} parks at {}", t.id, t.position);
                        t.operating_status = OperatingStatus::Parking;
                        t.speed = 0.0;
                    }
                    return Outcome::Keep;
                }
                Dwell::Departed => {
                    if self.stops_remaining(t) == 0 {
                        if self.reassign(t, now) {
                            return Outcome::Keep;
                        }
                        debug!("{} leaves service after its last departure", t.id);
                        return Outcome::Remove;
                    }
                }
            }
        }

        self.advance(t, now, log);
        Outcome::Keep
    }

    // ── Station state machine ─────────────────────────────────────────────

    fn current_train(&self, t: &PlacedTrain) -> Option<&Train> {
        t.train.and_then(|id| self.timetable.train(id))
    }

    fn dwell(&self, t: &mut PlacedTrain, now: SimTime) -> Dwell {
        let Some(train) = self.current_train(t) else {
            t.station_status = StationStatus::Running;
            return Dwell::Departed;
        };
        let Some(dia) = train.dia_times.get(t.next_dia) else {
            return Dwell::Terminated;
        };
        match dia.departure {
            None => Dwell::Terminated,
            Some(dep) if now >= dep => {
                debug!("{} departs {} at {now}", t.id, dia.platform);
                t.just_departed = Some(dia.platform);
                t.next_dia += 1;
                t.station_status = StationStatus::Running;
                t.speed = self.speed_to_next_stop(t, train, now);
                Dwell::Departed
            }
            Some(_) => Dwell::Hold,
        }
    }

    fn stops_remaining(&self, t: &PlacedTrain) -> usize {
        self.current_train(t)
            .map(|train| train.dia_times.iter().skip(t.next_dia).filter(|d| !d.is_passing).count())
            .unwrap_or(0)
    }

    /// Swap `t` onto the next train of its operation.  `false` if there is
    /// none.
    fn reassign(&self, t: &mut PlacedTrain, now: SimTime) -> bool {
        let Some(op_id) = t.operation else { return false };
        let Some(op) = self.timetable.operations.iter().find(|o| o.id == op_id) else {
            return false;
        };
        let Some(next) = op.trains.get(t.op_position + 1).and_then(|&id| self.timetable.train(id)) else {
            return false;
        };
        debug!("{} continues as {} ({})", t.id, next.id, next.name);
        *t = self.board(t.id, op_id, t.op_position + 1, next, now);
        true
    }

    /// Speed for leaving the current position toward the next stop.
    ///
    /// `distance / (arrival - margin - now) * time_step`, clamped to the
    /// configured range; the default speed when there is nothing to aim at.
    fn speed_to_next_stop(&self, t: &PlacedTrain, train: &Train, now: SimTime) -> f64 {
        let cfg = self.config;
        if cfg.speed_mode == SpeedMode::Fixed {
            return cfg.default_speed;
        }
        let Some(dia) = train.next_stop_from(t.next_dia).map(|k| &train.dia_times[k]) else {
            return cfg.default_speed;
        };
        let Some(arrival) = dia.reaching_time() else {
            return cfg.default_speed;
        };
        let distance = match self.network.distance_to_platform(t.track, t.position, dia.platform) {
            Ok(Some(d)) => d,
            Ok(None) => return cfg.default_speed,
            Err(err) => {
                warn!("{}: cannot measure distance to {}: {err}", t.id, dia.platform);
                return cfg.default_speed;
            }
        };
        let secs = arrival.since(now) - cfg.arrival_margin_secs;
        if secs <= 0 {
            return cfg.max_speed;
        }
        (distance / secs as f64 * cfg.time_step_secs as f64).clamp(cfg.min_speed, cfg.max_speed)
    }

    // ── Movement ──────────────────────────────────────────────────────────

    fn advance(&self, t: &mut PlacedTrain, now: SimTime, log: &mut DiagnosticLog) {
        let (track, position, just_departed) = (t.track, t.position, t.just_departed);
        match self.run(t, now, log) {
            Ok(()) => t.fault = None,
            Err(fault) => {
                t.track = track;
                t.position = position;
                t.just_departed = just_departed;
                if t.fault.as_ref() != Some(&fault) {
                    warn!("{} stopped on {track}: {fault}", t.id);
                    log.entries.push(Diagnostic::Fault { placed: t.id, fault: fault.clone(), at: now });
                }
                t.fault = Some(fault);
            }
        }
    }

    fn run(&self, t: &mut PlacedTrain, now: SimTime, log: &mut DiagnosticLog) -> Result<(), MovementFault> {
        let start = t.track;
        let mut remaining = t.speed.max(0.0);
        let mut hops = 0usize;

        loop {
            let track = self.network.track(t.track);
            let offset = track.offset_of(t.position);

            if let Some(k) = self.stop_on(t, track) {
                let to_stop = track.stop_offset() - offset;
                if to_stop >= -STOP_EPS && to_stop <= remaining + STOP_EPS {
                    t.position = track.stop_point();
                    t.station_status = StationStatus::Arrived;
                    t.next_dia = k;
                    debug!("{} arrives at {:?} at {now}", t.id, track.platform);
                    return Ok(());
                }
            }

            let left = track.length() - offset;
            if remaining <= left {
                t.position = track.point_at(offset + remaining);
                return Ok(());
            }
            remaining -= left;

            hops += 1;
            if hops > self.network.track_count() {
                return Err(MovementFault::RoutingLoop { track: start });
            }
            let next = self.next_track(t, now, log)?;
            t.track = next;
            t.position = self.network.track(next).begin;
            t.just_departed = None;
        }
    }

    /// Index of the stop `t` should make on `track`, if any.
    fn stop_on(&self, t: &PlacedTrain, track: &Track) -> Option<usize> {
        if t.routing != RoutingMode::Scheduled || t.operating_status != OperatingStatus::InService {
            return None;
        }
        let platform = track.platform?;
        if t.just_departed == Some(platform) {
            return None;
        }
        let train_id = t.train?;
        let k = self.timetable.train(train_id)?.next_stop_from(t.next_dia)?;
        (self.index.stop_at(train_id, platform, t.next_dia) == Some(k)).then_some(k)
    }

    fn next_stop_platform(&self, t: &PlacedTrain) -> Option<PlatformId> {
        let train = self.current_train(t)?;
        let k = train.next_stop_from(t.next_dia)?;
        Some(train.dia_times[k].platform)
    }

    fn next_track(&self, t: &mut PlacedTrain, now: SimTime, log: &mut DiagnosticLog) -> Result<TrackId, MovementFault> {
        let net = self.network;
        let train_id = match (t.routing, t.train) {
            (RoutingMode::Scheduled, Some(id)) if net.is_branch(t.track) => id,
            _ => return Ok(net.resolve_next(t.track, None)?),
        };

        let switch = net.track(t.track).next_switch;
        if let Some(command) = self.index.branch_command(train_id, switch) {
            return Ok(net.resolve_next(t.track, Some(command))?);
        }

        t.degraded = true;
        log.missing_entry(train_id, switch, now);
        if let Some(platform) = self.next_stop_platform(t) {
            match net.route_toward(t.track, platform) {
                Ok(Some(next)) => return Ok(next),
                Ok(None) => {}
                Err(err) => warn!("{}: search toward {platform} failed: {err}", t.id),
            }
        }
        Ok(net.resolve_next(t.track, Some(BranchCommand::Straight))?)
    }
}
