//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, SirRow, SiteOccupancyRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors never reach the tick loop — [`SimOutputObserver`]
/// [crate::SimOutputObserver] stores them internally for retrieval with
/// `take_error` after the run.
pub trait OutputWriter {
    /// Write one end-of-tick health tally row.
    fn write_sir(&mut self, row: &SirRow) -> OutputResult<()>;

    /// Write a batch of site occupancy snapshots.
    fn write_site_snapshots(&mut self, rows: &[SiteOccupancyRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
