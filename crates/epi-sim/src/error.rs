use epi_core::{PatternId, PersonId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("person {person} references pattern {pattern}, but the registry holds {registry_len}")]
    PatternOutOfRange {
        person:       PersonId,
        pattern:      PatternId,
        registry_len: usize,
    },

    #[error("world occupancy index is inconsistent with person site references")]
    InconsistentOccupancy,
}

pub type SimResult<T> = Result<T, SimError>;
