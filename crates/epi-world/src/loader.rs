//! CSV site roster loader.
//!
//! # CSV format
//!
//! One row per fixed site:
//!
//! ```csv
//! area_m2,capacity,dispersion,x,y,outdoor,essentiality
//! 52.5,4,1.0,-120.0,45.5,0,1.0
//! 240.0,16,1.0,10.0,-3.0,0,0.6
//! ```
//!
//! `outdoor` is `0`/`1`.  Every loaded site is a plain [`SiteKind::Fixed`]
//! site; stations and transit lines carry cross-references and are built in
//! code.  Rows are validated by [`World::add_site`], so a zero-area or
//! zero-capacity row fails the whole load with the offending row number.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use epi_core::{Coord, SiteId};

use crate::site::{FixedProfile, Site};
use crate::{World, WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SiteRecord {
    area_m2:      f64,
    capacity:     u32,
    dispersion:   f64,
    x:            f64,
    y:            f64,
    outdoor:      u8,
    essentiality: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load fixed sites from CSV `reader` into `world`.
///
/// Returns the ids of the added sites in row order.  On a malformed or
/// invalid row nothing after that row is added.
pub fn load_sites_reader<R: Read>(reader: R, world: &mut World) -> WorldResult<Vec<SiteId>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut ids = Vec::new();

    for (row, record) in csv_reader.deserialize::<SiteRecord>().enumerate() {
        let record = record?;
        let site = site_from_record(&record).map_err(|reason| WorldError::InvalidRosterRow {
            row: row + 1,
            reason,
        })?;
        ids.push(world.add_site(site)?);
    }

    Ok(ids)
}

/// Load fixed sites from a CSV file at `path` into `world`.
pub fn load_sites(path: &Path, world: &mut World) -> WorldResult<Vec<SiteId>> {
    let file = std::fs::File::open(path)?;
    load_sites_reader(file, world)
}

fn site_from_record(record: &SiteRecord) -> Result<Site, String> {
    let is_outdoor = match record.outdoor {
        0 => false,
        1 => true,
        other => return Err(format!("outdoor flag must be 0 or 1, got {other}")),
    };
    if !(0.0..=1.0).contains(&record.essentiality) {
        return Err(format!(
            "essentiality must be in [0, 1], got {}",
            record.essentiality
        ));
    }

    let mut profile = FixedProfile::new(Coord::new(record.x, record.y));
    profile.is_outdoor = is_outdoor;
    profile.essentiality = record.essentiality;

    Ok(Site::fixed(record.area_m2, record.capacity, record.dispersion, profile))
}
