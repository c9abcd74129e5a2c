//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `train_positions.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, TickSummaryRow, TrainPositionRow};

pub const POSITIONS_FILE: &str = "train_positions.csv";
pub const SUMMARIES_FILE: &str = "tick_summaries.csv";

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    positions: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files in it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut positions = Writer::from_path(dir.join(POSITIONS_FILE))?;
        positions.write_record(["time", "placed_id", "train_id", "x", "y", "name", "color"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record(["tick", "time", "moving_trains"])?;

        Ok(Self { positions, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_positions(&mut self, rows: &[TrainPositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.time_secs.to_string(),
                row.placed_id.to_string(),
                row.train_id.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                row.name.clone(),
                row.color.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.time_secs.to_string(),
            row.moving_trains.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
