//! Simulation observer trait for progress reporting and data collection.

use rail_core::SimTime;

use crate::TrainPosition;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_ticks`][crate::Sim::run_ticks] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, now: SimTime, moving: usize) {
///         if now.secs() % 3_600 == 0 {
///             println!("{now}: {moving} trains moving");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _now: SimTime) {}

    /// Called once every train has been updated.
    ///
    /// `moving` is the number of trains running with non-zero speed.
    fn on_tick_end(&mut self, _now: SimTime, _moving: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with the positions after this tick's update.
    fn on_snapshot(&mut self, _now: SimTime, _positions: &[TrainPosition]) {}

    /// Called once after [`Sim::run`][crate::Sim::run] reaches the end time.
    fn on_sim_end(&mut self, _final_time: SimTime) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
