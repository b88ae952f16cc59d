//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `sir_timeseries` and `site_occupancy`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, SirRow, SiteOccupancyRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS sir_timeseries (
                 tick        INTEGER PRIMARY KEY,
                 minutes     REAL    NOT NULL,
                 susceptible INTEGER NOT NULL,
                 infected    INTEGER NOT NULL,
                 recovered   INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS site_occupancy (
                 site_id             INTEGER NOT NULL,
                 tick                INTEGER NOT NULL,
                 occupants           INTEGER NOT NULL,
                 meeting_probability REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_sir(&mut self, row: &SirRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO sir_timeseries (tick, minutes, susceptible, infected, recovered) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.tick,
                row.minutes,
                row.susceptible,
                row.infected,
                row.recovered,
            ],
        )?;
        Ok(())
    }

    fn write_site_snapshots(&mut self, rows: &[SiteOccupancyRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO site_occupancy \
                 (site_id, tick, occupants, meeting_probability) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.site_id,
                    row.tick,
                    row.occupants,
                    row.meeting_probability,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
