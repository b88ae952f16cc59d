//! Simulation observer trait for progress reporting and data collection.

use epi_core::SimTime;
use epi_world::{SirCounts, World};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — daily progress printer
///
/// ```rust,ignore
/// struct DailyPrinter;
///
/// impl SimObserver for DailyPrinter {
///     fn on_tick_end(&mut self, _tick: u64, time: SimTime, counts: &SirCounts) {
///         if time.minute_of_day() == 0.0 {
///             let (s, i, r) = counts.proportions();
///             println!("{time}  S {:5.1}%  I {:5.1}%  R {:5.1}%", s * 100.0, i * 100.0, r * 100.0);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any phase runs.
    fn on_tick_start(&mut self, _time: SimTime) {}

    /// Called at the end of each tick with the fresh health tally.
    fn on_tick_end(&mut self, _tick: u64, _time: SimTime, _counts: &SirCounts) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to the whole world, so output writers
    /// can record occupancy without the sim knowing any output format.
    fn on_snapshot(&mut self, _tick: u64, _time: SimTime, _world: &World) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_time: SimTime) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
