//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, TickSummaryRow, TrainPositionRow};

/// Sink for simulation output rows.
///
/// Errors are returned here but stored by [`SimOutputObserver`][crate::SimOutputObserver]
/// and retrieved with its `take_error`.
pub trait OutputWriter {
    /// Write one snapshot's worth of train positions.
    fn write_positions(&mut self, rows: &[TrainPositionRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
