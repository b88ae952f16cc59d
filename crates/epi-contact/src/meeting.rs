//! The ephemeral `Meeting` record.

use epi_core::{PersonId, SimTime, SiteId};
use epi_world::World;

/// One sampled pairwise contact: two people, one site, one tick.
///
/// Meetings live in a tick-local buffer inside the infection phase — they are
/// consumed immediately and never stored on `Person` or `Site`.  An external
/// logging collaborator may copy them out before they are discarded.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Meeting {
    /// When the contact was sampled.
    pub time: SimTime,

    /// The two participants.  A person may appear in several meetings in the
    /// same tick; sampling does not deduplicate.
    pub participants: [PersonId; 2],

    /// Where the contact happened.
    pub site: SiteId,
}

impl Meeting {
    /// `true` if at least one participant is currently infected — only such
    /// meetings can change anyone's state.
    pub fn involves_infection(&self, world: &World) -> bool {
        self.participants
            .iter()
            .any(|&person| world.person(person).is_infected())
    }
}
