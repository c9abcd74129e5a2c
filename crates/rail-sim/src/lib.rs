//! `rail-sim` — tick-driven train movement for the rust_rail simulator.
//!
//! # Tick loop
//!
//! ```text
//! while now <= config.end_time:
//!   ① Spawn   — operations whose window contains `now` get a placed train
//!               on their first train's start track (deferred if occupied).
//!   ② Update  — each placed train, in placement order:
//!                 Arrived → depart when `now >= departure`, else hold;
//!                 Running → move `speed` units, crossing switches and
//!                           halting at the stop point of its next stop.
//!   ③ Advance — clock += time_step_secs.
//! ```
//!
//! The network and timetable are read-only for the whole run; only placed
//! trains and the clock change.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rail_core::SimConfig;
//! use rail_sim::{NoopObserver, SimBuilder};
//!
//! let (timetable, _report) = rail_timetable::normalize(raw_timetable);
//! let mut sim = SimBuilder::new(SimConfig::default(), network)
//!     .timetable(timetable)
//!     .build()?;
//! let timeline = sim.record_timeline();
//! ```

pub mod builder;
mod engine;
pub mod error;
pub mod observer;
pub mod sim;
pub mod timeline;
pub mod train;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use timeline::{Timeline, TimelineRecord, TimelineRecorder, TrainPosition};
pub use train::{Diagnostic, MovementFault, OperatingStatus, PlacedTrain, RoutingMode, StationStatus};
