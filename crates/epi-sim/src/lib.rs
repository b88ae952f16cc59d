//! `epi-sim` — the tick loop.
//!
//! # Three-phase tick
//!
//! ```text
//! for each tick:
//!   ① Transit    — vehicles dock, depart, and idle per their timetables.
//!   ② Movement   — every person, in creation order, runs the two-state
//!                  occupancy machine (commuting rules, arrivals, dwell).
//!   ③ Infection  — every non-sentinel site, in creation order, samples
//!                  meetings and applies heal/infect outcomes.
//! ```
//!
//! The phases are fully ordered: infection always reads the settled
//! post-movement occupancy, never a half-moved world.  One seeded RNG stream
//! is consumed across both stochastic phases in this fixed order, so a run
//! is a pure function of `(world, patterns, policy, config)`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use epi_policy::OpenPolicy;
//! use epi_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, world, OpenPolicy)
//!     .patterns(patterns)
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! println!("{:?}", sim.world.sir_counts());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{advance_tick, Sim};
