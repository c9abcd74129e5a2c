//! `rail-timetable` — what the trains are supposed to do.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`model`]     | `Station`, `DiaTime`, `Train`, `Operation`, `Timetable`    |
//! | [`index`]     | `TimetableIndex` — per-tick lookup maps                    |
//! | [`normalize`] | interpolation, platform conflict resolution, report       |
//! | [`loader`]    | `load_dia_times_csv`, `load_dia_times_reader`              |
//! | [`error`]     | `TimetableError`, `TimetableResult<T>`                     |
//!
//! # Pipeline
//!
//! ```text
//! raw Timetable ──normalize()──▶ (dense, deconflicted Timetable, NormalizeReport)
//!                                        │
//!                          TimetableIndex::build()  (read-only, per tick)
//! ```
//!
//! The normalizer runs once, before any simulation starts.

pub mod error;
pub mod index;
pub mod loader;
pub mod model;
pub mod normalize;


pub use error::{TimetableError, TimetableResult};
pub use index::TimetableIndex;
pub use loader::{load_dia_times_csv, load_dia_times_reader};
pub use model::{BranchEntry, DiaTime, Operation, Station, Timetable, Train};
pub use normalize::{NormalizeReport, TimetableIssue, interpolate, normalize, resolve_conflicts};
