//! The `World` store: all sites, people, households, and areas of a run.
//!
//! # Why one store?
//!
//! A person's move writes to two sites (the one left and the one entered) and
//! to the person itself.  Keeping all three collections behind one owner lets
//! the membership operations ([`transfer`][World::transfer],
//! [`begin_trip`][World::begin_trip]) uphold the occupancy invariant in a
//! single place instead of trusting every caller.
//!
//! All collections are `Vec`s indexed by their typed id, in creation order.
//! The phases iterate them in that order, which — together with the single
//! seeded RNG stream — makes runs reproducible.

use epi_core::{AreaId, HouseholdId, PersonId, SimTime, SiteId};

use crate::household::Household;
use crate::person::Person;
use crate::site::{BoundedArea, Site, SiteKind};
use crate::{WorldError, WorldResult};

// ── SirCounts ─────────────────────────────────────────────────────────────────

/// Aggregate health counts, consumed by the metrics collaborator.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct SirCounts {
    /// Never infected and currently healthy.
    pub susceptible: usize,
    /// Currently ill (`illness_degree > 0`).
    pub infected: usize,
    /// Healthy with acquired immunity.
    pub recovered: usize,
}

impl SirCounts {
    #[inline]
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }

    /// `(S, I, R)` proportions.  All zeros for an empty population.
    pub fn proportions(&self) -> (f64, f64, f64) {
        let total = self.total();
        if total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let t = total as f64;
        (
            self.susceptible as f64 / t,
            self.infected as f64 / t,
            self.recovered as f64 / t,
        )
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The complete simulated world.
///
/// Created empty (apart from the transit sentinel at [`SiteId::DUMMY`]),
/// populated through the fail-fast `add_*` operations, then mutated in place
/// by the movement and infection phases.
pub struct World {
    sites:      Vec<Site>,
    people:     Vec<Person>,
    households: Vec<Household>,
    areas:      Vec<BoundedArea>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// An empty world containing only the transit sentinel.
    pub fn new() -> Self {
        Self {
            sites:      vec![Site::dummy()],
            people:     Vec::new(),
            households: Vec::new(),
            areas:      Vec::new(),
        }
    }

    // ── Construction (fail-fast validation) ───────────────────────────────

    /// Add a site, validating its parameters.
    ///
    /// Transit vehicles additionally require a path of at least two existing
    /// station sites, a matching leg table with positive finite travel times,
    /// and start minutes within a day.
    pub fn add_site(&mut self, site: Site) -> WorldResult<SiteId> {
        let id = SiteId(self.sites.len() as u32);

        if !(site.area_m2.is_finite() && site.area_m2 > 0.0) {
            return Err(WorldError::NonPositiveArea(id));
        }
        if site.nominal_capacity == 0 {
            return Err(WorldError::NonPositiveCapacity(id));
        }
        if !(site.dispersion_factor.is_finite() && site.dispersion_factor >= 0.0) {
            return Err(WorldError::InvalidDispersion(id));
        }

        if let SiteKind::Transit(line) = &site.kind {
            if line.path.len() < 2 {
                return Err(WorldError::PathTooShort(id));
            }
            if line.leg_minutes.len() != line.path.len() - 1 {
                return Err(WorldError::LegTableMismatch {
                    line:     id,
                    expected: line.path.len() - 1,
                    got:      line.leg_minutes.len(),
                });
            }
            for (leg, &minutes) in line.leg_minutes.iter().enumerate() {
                if !(minutes.is_finite() && minutes > 0.0) {
                    return Err(WorldError::InvalidLegMinutes { line: id, leg });
                }
            }
            for &(_, minute) in &line.start_times {
                if !(0.0..epi_core::MINUTES_PER_DAY).contains(&minute) {
                    return Err(WorldError::InvalidStartTime { line: id, minute });
                }
            }
            for &station in &line.path {
                let target = self
                    .sites
                    .get(station.index())
                    .ok_or(WorldError::SiteNotFound(station))?;
                if !matches!(target.kind, SiteKind::Station { .. }) {
                    return Err(WorldError::NotAStation { line: id, station });
                }
            }
        }

        self.sites.push(site);
        Ok(id)
    }

    /// Record that `line` (a transit vehicle) serves `station`.
    ///
    /// Called by world generation after both sites exist; the station's line
    /// list is informational (rule construction reads it), not simulated.
    pub fn register_line(&mut self, station: SiteId, line: SiteId) -> WorldResult<()> {
        if self.sites.get(line.index()).is_none() {
            return Err(WorldError::SiteNotFound(line));
        }
        let target = self
            .sites
            .get_mut(station.index())
            .ok_or(WorldError::SiteNotFound(station))?;
        match &mut target.kind {
            SiteKind::Station { lines, .. } => {
                if !lines.contains(&line) {
                    lines.push(line);
                }
                Ok(())
            }
            _ => Err(WorldError::NotAStation { line, station }),
        }
    }

    /// Add a bounded area (city or district).
    pub fn add_area(&mut self, area: BoundedArea) -> AreaId {
        let id = AreaId(self.areas.len() as u16);
        self.areas.push(area);
        id
    }

    /// Add a household living at `home`, which must be a fixed site.
    pub fn add_household(&mut self, home: SiteId) -> WorldResult<HouseholdId> {
        let site = self
            .sites
            .get(home.index())
            .ok_or(WorldError::SiteNotFound(home))?;
        if !matches!(site.kind, SiteKind::Fixed(_)) {
            return Err(WorldError::HomeNotFixed(home));
        }
        let id = HouseholdId(self.households.len() as u32);
        self.households.push(Household::new(home));
        Ok(id)
    }

    /// Add a person to `household`, initially resident at `initial_site`.
    ///
    /// Establishes both halves of the occupancy invariant and links the
    /// household membership.  People always start resident somewhere real —
    /// never in the transit sentinel.
    pub fn add_person(
        &mut self,
        mut person:   Person,
        household:    HouseholdId,
        initial_site: SiteId,
    ) -> WorldResult<PersonId> {
        if self.households.get(household.index()).is_none() {
            return Err(WorldError::HouseholdNotFound(household));
        }
        if initial_site == SiteId::DUMMY {
            return Err(WorldError::InitialSiteIsDummy);
        }
        if self.sites.get(initial_site.index()).is_none() {
            return Err(WorldError::SiteNotFound(initial_site));
        }

        let id = PersonId(self.people.len() as u32);
        person.household = household;
        person.site = initial_site;
        person.trip = None;

        self.sites[initial_site.index()].add_occupant(id);
        self.households[household.index()].members.push(id);
        self.people.push(person);
        Ok(id)
    }

    // ── Membership operations ─────────────────────────────────────────────

    /// Move `person` to `new_site`, keeping both halves of the occupancy
    /// invariant in agreement.
    ///
    /// A transfer to the site already occupied is a no-op (in particular it
    /// does not reset dwell time).  Leaving the transit sentinel clears the
    /// stored trip.  Dwell time resets to 0 on every actual change.
    pub fn transfer(&mut self, person: PersonId, new_site: SiteId) {
        let old_site = self.people[person.index()].site;
        if old_site == new_site {
            return;
        }

        if old_site == SiteId::DUMMY {
            self.people[person.index()].trip = None;
        }

        self.sites[old_site.index()].remove_occupant(person);
        self.sites[new_site.index()].add_occupant(person);

        let p = &mut self.people[person.index()];
        p.site = new_site;
        p.dwell_minutes = 0.0;
    }

    /// Put `person` into the transit sentinel, bound for `destination` at
    /// `arrival`.
    pub fn begin_trip(&mut self, person: PersonId, destination: SiteId, arrival: SimTime) {
        self.transfer(person, SiteId::DUMMY);
        self.people[person.index()].trip =
            Some(crate::person::Trip { destination, arrival });
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.index()]
    }

    #[inline]
    pub fn site_mut(&mut self, id: SiteId) -> &mut Site {
        &mut self.sites[id.index()]
    }

    #[inline]
    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id.index()]
    }

    #[inline]
    pub fn person_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.people[id.index()]
    }

    #[inline]
    pub fn household(&self, id: HouseholdId) -> &Household {
        &self.households[id.index()]
    }

    #[inline]
    pub fn area(&self, id: AreaId) -> &BoundedArea {
        &self.areas[id.index()]
    }

    #[inline]
    pub fn area_mut(&mut self, id: AreaId) -> &mut BoundedArea {
        &mut self.areas[id.index()]
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn person_count(&self) -> usize {
        self.people.len()
    }

    pub fn household_count(&self) -> usize {
        self.households.len()
    }

    /// All site ids in creation order, including the transit sentinel.
    pub fn site_ids(&self) -> impl Iterator<Item = SiteId> + '_ {
        (0..self.sites.len() as u32).map(SiteId)
    }

    /// Site ids eligible for the infection phase: everything but the sentinel.
    pub fn infection_site_ids(&self) -> impl Iterator<Item = SiteId> + '_ {
        (1..self.sites.len() as u32).map(SiteId)
    }

    /// All person ids in creation order — the canonical iteration order of
    /// the movement phase.
    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.people.len() as u32).map(PersonId)
    }

    /// Read-only view of all people, indexed by `PersonId`.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Read-only view of all sites, indexed by `SiteId`.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    // ── Aggregates ────────────────────────────────────────────────────────

    /// Current susceptible/infected/recovered tally.
    pub fn sir_counts(&self) -> SirCounts {
        let mut counts = SirCounts::default();
        for person in &self.people {
            if person.illness_degree > 0.0 {
                counts.infected += 1;
            } else if person.immunity_degree > 0.0 {
                counts.recovered += 1;
            } else {
                counts.susceptible += 1;
            }
        }
        counts
    }

    /// Verify the occupancy invariant: every person is claimed by exactly one
    /// site, and that site is the one the person references.
    ///
    /// O(people + occupant entries); used by the simulation builder and by
    /// tests, not on the tick path.
    pub fn occupancy_consistent(&self) -> bool {
        let mut seen = vec![0u32; self.people.len()];
        for (idx, site) in self.sites.iter().enumerate() {
            for &person in site.occupants() {
                match self.people.get(person.index()) {
                    Some(p) if p.site.index() == idx => seen[person.index()] += 1,
                    _ => return false,
                }
            }
        }
        seen.iter().all(|&count| count == 1)
    }
}
