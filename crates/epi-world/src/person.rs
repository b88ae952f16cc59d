//! The `Person` record and its small enums.

use epi_core::{HouseholdId, PatternId, SimTime, SiteId};

/// Biological sex, as recorded by population generation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Sex {
    Female,
    Male,
}

/// Coarse occupation class; drives which commuting rules a person receives.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Occupation {
    #[default]
    Unemployed,
    Worker,
    Student,
    Other,
}

/// An in-progress journey.  Exists exactly while the person occupies the
/// transit sentinel.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Trip {
    /// Where the person will surface.
    pub destination: SiteId,
    /// When `destination` is reached (compare with `>=` against the clock).
    pub arrival: SimTime,
}

/// A single person.
///
/// Created by population generation, mutated each tick by the movement and
/// infection phases, never destroyed during a run.  The `site` field is the
/// owning half of the occupancy invariant — change it only through
/// [`World::transfer`][crate::World::transfer] or
/// [`World::begin_trip`][crate::World::begin_trip].
#[derive(Clone, Debug)]
pub struct Person {
    /// Age in years.
    pub age: f64,
    pub sex: Sex,
    pub occupation: Occupation,

    /// The household this person belongs to.  Set by `World::add_person`.
    pub household: HouseholdId,

    // ── Illness state, all degrees in [0, 1] ──────────────────────────────
    /// Multiplier on this person's chance of getting infected.
    pub susceptibility_degree: f64,
    /// Strictly positive iff the person is currently infected.
    pub illness_degree: f64,
    pub symptoms_degree: f64,
    /// Acquired immunity; scales infection probability down.
    pub immunity_degree: f64,

    /// How closely the person follows policy rules (masks, distancing, …).
    /// Consumed by `Policy` implementations; the core never reads it.
    pub abides_by_rules_degree: f64,

    /// Cumulative minutes spent infected; `None` while healthy.
    pub infected_minutes: Option<f64>,

    // ── Occupancy state ───────────────────────────────────────────────────
    /// The site currently occupied (the transit sentinel while travelling).
    pub site: SiteId,

    /// Minutes continuously spent in `site`.  Reset to 0 on every change.
    pub dwell_minutes: f64,

    /// Commuting rules in priority order — the first rule that fires on a
    /// tick wins and the rest are skipped.
    pub patterns: Vec<PatternId>,

    /// `Some` exactly while `site == SiteId::DUMMY`.
    pub trip: Option<Trip>,
}

impl Person {
    /// A healthy, fully susceptible person with no commuting rules.
    /// Population generation fills in the rest before `World::add_person`.
    pub fn new(age: f64, sex: Sex, occupation: Occupation) -> Self {
        Self {
            age,
            sex,
            occupation,
            household:              HouseholdId::INVALID,
            susceptibility_degree:  1.0,
            illness_degree:         0.0,
            symptoms_degree:        0.0,
            immunity_degree:        0.0,
            abides_by_rules_degree: 0.0,
            infected_minutes:       None,
            site:                   SiteId::INVALID,
            dwell_minutes:          0.0,
            patterns:               Vec::new(),
            trip:                   None,
        }
    }

    /// `true` iff currently infected.
    #[inline]
    pub fn is_infected(&self) -> bool {
        self.illness_degree > 0.0
    }

    /// `true` while the person occupies the transit sentinel.
    #[inline]
    pub fn is_in_transit(&self) -> bool {
        self.trip.is_some()
    }
}
