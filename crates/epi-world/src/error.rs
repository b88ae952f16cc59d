use epi_core::{HouseholdId, SiteId};
use thiserror::Error;

/// Construction-time validation failures.
///
/// Everything here is reported at world-building time; once a `World` is
/// assembled, every per-tick computation is total.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("site {0}: effective area must be positive and finite")]
    NonPositiveArea(SiteId),

    #[error("site {0}: nominal capacity must be positive")]
    NonPositiveCapacity(SiteId),

    #[error("site {0}: dispersion factor must be finite and non-negative")]
    InvalidDispersion(SiteId),

    #[error("transit line {0}: path must contain at least two stations")]
    PathTooShort(SiteId),

    #[error("transit line {line}: leg table has {got} entries, path needs {expected}")]
    LegTableMismatch {
        line:     SiteId,
        expected: usize,
        got:      usize,
    },

    #[error("transit line {line}: leg {leg} travel time must be positive and finite")]
    InvalidLegMinutes { line: SiteId, leg: usize },

    #[error("transit line {line}: start minute {minute} is outside a day")]
    InvalidStartTime { line: SiteId, minute: f64 },

    #[error("transit line {line}: {station} is not a transport station")]
    NotAStation { line: SiteId, station: SiteId },

    #[error("site {0} not found")]
    SiteNotFound(SiteId),

    #[error("household {0} not found")]
    HouseholdNotFound(HouseholdId),

    #[error("household home {0} must be a fixed site")]
    HomeNotFixed(SiteId),

    #[error("a person's initial site cannot be the transit sentinel")]
    InitialSiteIsDummy,

    #[error("site roster row {row}: {reason}")]
    InvalidRosterRow { row: usize, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for world construction.
pub type WorldResult<T> = Result<T, WorldError>;
