//! CSV timetable loader.
//!
//! # CSV format
//!
//! One row per station visit, in travel order within each train.
//!
//! ```csv
//! train_id,station_id,platform_id,arrival,departure,passing
//! 0,0,0,,06:00,
//! 0,1,2,06:04,06:05,
//! 0,2,4,06:09:30,06:09:30,true
//! 1,0,1,,06:10,
//! ```
//!
//! **Times** are `HH:MM`, `HH:MM:SS`, or plain seconds since midnight; a
//! blank field means "not given".  **`passing`** accepts `true`/`false`,
//! `1`/`0`, `yes`/`no`, or blank (a stop).
//!
//! Trains absent from the CSV receive an empty list.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rail_core::{PlatformId, SimTime, StationId};

use crate::{DiaTime, TimetableError, TimetableResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DiaTimeRecord {
    train_id:    u32,
    station_id:  u32,
    platform_id: u32,
    arrival:     String,
    departure:   String,
    passing:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-train `DiaTime` lists from a CSV file.
///
/// Returns a `Vec` of length `train_count`, indexed by `TrainId`.
pub fn load_dia_times_csv(path: &Path, train_count: usize) -> TimetableResult<Vec<Vec<DiaTime>>> {
    let file = std::fs::File::open(path)?;
    load_dia_times_reader(file, train_count)
}

/// Like [`load_dia_times_csv`] but accepts any `Read` source.
pub fn load_dia_times_reader<R: Read>(reader: R, train_count: usize) -> TimetableResult<Vec<Vec<DiaTime>>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_train: HashMap<u32, Vec<DiaTime>> = HashMap::new();

    for (line, result) in csv_reader.deserialize::<DiaTimeRecord>().enumerate() {
        let row = result.map_err(|e| TimetableError::Parse(e.to_string()))?;
        if row.train_id as usize >= train_count {
            return Err(TimetableError::Parse(format!(
                "row {}: train_id {} out of range (train_count = {train_count})",
                line + 1,
                row.train_id,
            )));
        }
        let entry = DiaTime {
            station:      StationId(row.station_id),
            platform:     PlatformId(row.platform_id),
            arrival:      parse_time(&row.arrival)?,
            departure:    parse_time(&row.departure)?,
            is_passing:   parse_flag(&row.passing)?,
            interpolated: false,
        };
        by_train.entry(row.train_id).or_default().push(entry);
    }

    Ok((0..train_count as u32)
        .map(|i| by_train.remove(&i).unwrap_or_default())
        .collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_time(s: &str) -> TimetableResult<Option<SimTime>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<SimTime>()
        .map(Some)
        .map_err(|e| TimetableError::Parse(e.to_string()))
}

fn parse_flag(s: &str) -> TimetableResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        other => Err(TimetableError::Parse(format!(
            "invalid passing flag {other:?}: expected true/false, 1/0, yes/no, or blank"
        ))),
    }
}
