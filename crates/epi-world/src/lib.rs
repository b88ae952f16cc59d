//! `epi-world` — sites, people, households, and the world store.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`site`]      | `Site`, `SiteKind`, `FixedProfile`, `TransitLine`, `BoundedArea` |
//! | [`person`]    | `Person`, `Sex`, `Occupation`, `Trip`                      |
//! | [`household`] | `Household`                                                |
//! | [`world`]     | `World` store, membership operations, `SirCounts`          |
//! | [`loader`]    | CSV site roster loader                                     |
//! | [`error`]     | `WorldError`, `WorldResult`                                |
//!
//! # The occupancy invariant
//!
//! A person's `site` field is the owning reference; a site's occupant vector
//! is a derived index.  The two are kept in agreement by routing every
//! membership change through [`World::transfer`] or [`World::begin_trip`] —
//! nothing else may touch occupant vectors.

pub mod error;
pub mod household;
pub mod loader;
pub mod person;
pub mod site;
pub mod world;


pub use error::{WorldError, WorldResult};
pub use household::Household;
pub use loader::{load_sites, load_sites_reader};
pub use person::{Occupation, Person, Sex, Trip};
pub use site::{BoundedArea, FixedProfile, Site, SiteKind, TransitLine};
pub use world::{SirCounts, World};
