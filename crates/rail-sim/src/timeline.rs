//! Position snapshots and the recorded timeline.

use rail_core::{PlacedTrainId, Point, SimTime, TrainId};

use crate::{Sim, SimObserver};

/// Where one placed train is, for display.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainPosition {
    pub train_id:     PlacedTrainId,
    /// Timetable train currently run; `None` for hand-placed trains.
    pub train:        Option<TrainId>,
    pub position:     Point,
    pub display_name: String,
    pub color:        String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineRecord {
    pub time:      SimTime,
    pub positions: Vec<TrainPosition>,
}

/// Every snapshot of a run, in time order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    pub min_time:  SimTime,
    pub max_time:  SimTime,
    /// Seconds between consecutive records.
    pub time_step: u64,
    pub records:   Vec<TimelineRecord>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last record at or before `time`.
    pub fn at(&self, time: SimTime) -> Option<&TimelineRecord> {
        let i = self.records.partition_point(|r| r.time <= time);
        i.checked_sub(1).map(|i| &self.records[i])
    }
}

/// Observer that keeps every snapshot.
#[derive(Debug, Default)]
pub struct TimelineRecorder {
    timeline: Timeline,
}

impl TimelineRecorder {
    pub fn new(time_step: u64) -> Self {
        Self { timeline: Timeline { time_step, ..Timeline::default() } }
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }
}

impl SimObserver for TimelineRecorder {
    fn on_snapshot(&mut self, now: SimTime, positions: &[TrainPosition]) {
        let tl = &mut self.timeline;
        if tl.records.is_empty() {
            tl.min_time = now;
        }
        tl.max_time = now;
        tl.records.push(TimelineRecord { time: now, positions: positions.to_vec() });
    }
}

impl Sim {
    /// Run to the end time and return every snapshot taken on the way.
    pub fn record_timeline(&mut self) -> Timeline {
        let step = self.config.time_step_secs as u64 * self.config.output_interval_ticks.max(1);
        let mut recorder = TimelineRecorder::new(step);
        self.run(&mut recorder);
        recorder.into_timeline()
    }
}
