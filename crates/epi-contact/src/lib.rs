//! `epi-contact` — who meets whom, and what it does to them.
//!
//! Runs once per site per tick, strictly after the movement phase, so every
//! density and contact computation sees the settled post-movement occupancy.
//!
//! # Crate layout
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`meeting`]  | the ephemeral `Meeting` record                      |
//! | [`sampling`] | per-site pairwise contact sampling                  |
//! | [`infection`]| infecting score, heal/infect outcomes, phase driver |

pub mod infection;
pub mod meeting;
pub mod sampling;


pub use infection::{healing_probability, infecting_score, run_infection_phase};
pub use meeting::Meeting;
pub use sampling::sample_meetings;
