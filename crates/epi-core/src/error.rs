//! Base error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `EpiError` via `From` impls or keep them separate and wrap `EpiError` as
//! one variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.

use thiserror::Error;

use crate::{PersonId, SiteId};

/// The top-level error type for `epi-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum EpiError {
    #[error("person {0} not found")]
    PersonNotFound(PersonId),

    #[error("site {0} not found")]
    SiteNotFound(SiteId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type shared by the `epi-*` crates.
pub type EpiResult<T> = Result<T, EpiError>;
