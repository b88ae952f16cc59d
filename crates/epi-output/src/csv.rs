//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `sir_timeseries.csv`
//! - `site_occupancy.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, SirRow, SiteOccupancyRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    sir:       Writer<File>,
    occupancy: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut sir = Writer::from_path(dir.join("sir_timeseries.csv"))?;
        sir.write_record(["tick", "minutes", "susceptible", "infected", "recovered"])?;

        let mut occupancy = Writer::from_path(dir.join("site_occupancy.csv"))?;
        occupancy.write_record(["site_id", "tick", "occupants", "meeting_probability"])?;

        Ok(Self {
            sir,
            occupancy,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_sir(&mut self, row: &SirRow) -> OutputResult<()> {
        self.sir.write_record(&[
            row.tick.to_string(),
            row.minutes.to_string(),
            row.susceptible.to_string(),
            row.infected.to_string(),
            row.recovered.to_string(),
        ])?;
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteOccupancyRow]) -> OutputResult<()> {
        for row in rows {
            self.occupancy.write_record(&[
                row.site_id.to_string(),
                row.tick.to_string(),
                row.occupants.to_string(),
                row.meeting_probability.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.sir.flush()?;
        self.occupancy.flush()?;
        Ok(())
    }
}
