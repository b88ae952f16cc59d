use thiserror::Error;

/// Rule construction failures.
///
/// All of these surface from [`CommutingPatternBuilder::build`]
/// [crate::CommutingPatternBuilder::build] — a constructed pattern is always
/// well-formed and its evaluation is total.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("a commuting pattern needs at least one destination")]
    EmptyDestinations,

    #[error("an origin condition with no sites can never hold")]
    EmptyOrigins,

    #[error("trigger probability per minute must be finite and non-negative, got {0}")]
    InvalidProbability(f64),

    #[error("minute window [{start}, {end}] is not a valid interval within a day")]
    InvalidWindow { start: f64, end: f64 },

    #[error("minimum dwell time must be finite and non-negative, got {0}")]
    InvalidMinDwell(f64),

    #[error("fixed travel time must be finite and non-negative, got {0}")]
    InvalidTravelTime(f64),

    #[error("a commuting pattern needs a travel time")]
    MissingTravelTime,

    #[error("a commuting pattern needs a trigger probability")]
    MissingProbability,
}

/// Shorthand result type for pattern construction.
pub type PatternResult<T> = Result<T, PatternError>;
