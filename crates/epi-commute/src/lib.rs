//! `epi-commute` — conditional, probabilistic relocation rules.
//!
//! A [`CommutingPattern`] is an immutable rule attached to a person: "when my
//! conditions hold, with some per-minute probability, go to one of these
//! places".  A person carries an ordered list of patterns; each tick the
//! movement phase tries them in order and the first one that fires wins.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`pattern`]  | `CommutingPattern`, `WeekdaySet`, `MinuteWindow`, `TravelTime`, builder |
//! | [`engine`]   | `CommutingPattern::apply` — the evaluation order        |
//! | [`error`]    | `PatternError`, `PatternResult`                         |

pub mod engine;
pub mod error;
pub mod pattern;

#[cfg(test)]
mod tests;

pub use engine::Commute;
pub use error::{PatternError, PatternResult};
pub use pattern::{
    CommutingPattern, CommutingPatternBuilder, MinuteWindow, TravelTime, WeekdaySet,
};
