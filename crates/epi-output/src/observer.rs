//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use epi_core::SimTime;
use epi_sim::SimObserver;
use epi_world::{SirCounts, World};

use crate::row::{SirRow, SiteOccupancyRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes the SIR time series and site occupancy
/// snapshots to any [`OutputWriter`] backend (CSV, SQLite).
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
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

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: u64, time: SimTime, counts: &SirCounts) {
        let row = SirRow {
            tick,
            minutes:     time.minutes(),
            susceptible: counts.susceptible as u64,
            infected:    counts.infected as u64,
            recovered:   counts.recovered as u64,
        };
        let result = self.writer.write_sir(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: u64, _time: SimTime, world: &World) {
        let rows: Vec<SiteOccupancyRow> = world
            .infection_site_ids()
            .map(|id| {
                let site = world.site(id);
                SiteOccupancyRow {
                    site_id:             id.0,
                    tick,
                    occupants:           site.occupant_count() as u64,
                    meeting_probability: site.meeting_probability,
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_site_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_time: SimTime) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
