//! `rail-core` — foundational types for the `rust_rail` railway simulator.
//!
//! This crate is a dependency of every other `rail-*` crate.  It has no
//! `rail-*` dependencies and only `thiserror` (plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                     |
//! |-----------|--------------------------------------------------------------|
//! | [`ids`]   | `TrackId`, `SwitchId`, `PlatformId`, `StationId`, `TrainId`, |
//! |           | `OperationId`, `PlacedTrainId`                               |
//! | [`geo`]   | `Point` and planar vector helpers                            |
//! | [`time`]  | `SimTime`, `SimClock`, `SimConfig`, `SpeedMode`              |
//! | [`error`] | `RailError`                                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::RailError;
pub use geo::Point;
pub use ids::{OperationId, PlacedTrainId, PlatformId, StationId, SwitchId, TrackId, TrainId};
pub use time::{SimClock, SimConfig, SimTime, SpeedMode};
