//! `epi-core` — foundational types for the site-based contagion simulator.
//!
//! This crate is a dependency of every other `epi-*` crate.  It intentionally
//! has no `epi-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `SiteId`, `HouseholdId`, `PatternId`, `AreaId` |
//! | [`coord`]       | `Coord`, planar distance                              |
//! | [`time`]        | `Weekday`, `SimTime`, `SimClock`, `SimConfig`         |
//! | [`rng`]         | `SimRng` (single seeded stream)                       |
//! | [`error`]       | `EpiError`, `EpiResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod coord;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::Coord;
pub use error::{EpiError, EpiResult};
pub use ids::{AreaId, HouseholdId, PatternId, PersonId, SiteId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, SimTime, Weekday, MINUTES_PER_DAY, MINUTES_PER_WEEK};
