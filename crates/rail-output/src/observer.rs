//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use log::error;

use rail_core::{SimConfig, SimTime, TrainId};
use rail_sim::{SimObserver, TrainPosition};

use crate::row::{TickSummaryRow, TrainPositionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes train positions and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:         W,
    start:          SimTime,
    time_step_secs: u32,
    last_error:     Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to number ticks.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            start:          config.start_time,
            time_step_secs: config.time_step_secs,
            last_error:     None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn tick_of(&self, now: SimTime) -> u64 {
        (now.since(self.start).max(0) / self.time_step_secs.max(1) as i64) as u64
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                error!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, now: SimTime, moving: usize) {
        let row = TickSummaryRow {
            tick:          self.tick_of(now),
            time_secs:     now.secs(),
            moving_trains: moving as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, now: SimTime, positions: &[TrainPosition]) {
        if positions.is_empty() {
            return;
        }
        let rows: Vec<TrainPositionRow> = positions
            .iter()
            .map(|p| TrainPositionRow {
                time_secs: now.secs(),
                placed_id: p.train_id.0,
                train_id:  p.train.unwrap_or(TrainId::INVALID).0,
                x:         p.position.x,
                y:         p.position.y,
                name:      p.display_name.clone(),
                color:     p.color.clone(),
            })
            .collect();
        let result = self.writer.write_positions(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_time: SimTime) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
