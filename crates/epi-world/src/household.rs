//! The `Household` record.

use epi_core::{PersonId, SiteId};

/// A group of people living in the same home site (usually a family).
///
/// Purely structural: used to seed each member's initial location and by
/// commuting-rule construction (the "return home" rules point at `home`).
#[derive(Clone, Debug)]
pub struct Household {
    /// Members, in creation order.  Maintained by `World::add_person`.
    pub members: Vec<PersonId>,

    /// The fixed site the members live in.
    pub home: SiteId,
}

impl Household {
    pub fn new(home: SiteId) -> Self {
        Self { members: Vec::new(), home }
    }
}
