//! Site types: places that hold people.
//!
//! A site is anything a person can occupy — a home, a business, a transport
//! station, a moving vehicle, or the process-wide transit sentinel.  The
//! variants differ only in their *placement* behaviour; occupancy, density,
//! and meeting probability are common to all of them and live on [`Site`]
//! itself.
//!
//! # Mobility as a capability
//!
//! The commuting engine never inspects a site's concrete variant.  It asks
//! two questions: [`Site::is_mobile`] ("can this place change location?") and
//! [`Site::docked_station`] ("if mobile, where is it docked right now?").
//! Destination reachability is defined entirely in terms of those answers.

use epi_core::{AreaId, Coord, PersonId, SimTime, SiteId, Weekday};

// ── BoundedArea ───────────────────────────────────────────────────────────────

/// A named collection of sites — a city or a district.
///
/// Purely structural: world generation groups fixed sites into areas so that
/// commuting rules and policies can condition on them.
#[derive(Clone, Debug, Default)]
pub struct BoundedArea {
    /// Sites that belong to this area.
    pub sites: Vec<SiteId>,
}

// ── FixedProfile ──────────────────────────────────────────────────────────────

/// The placement data shared by all immobile sites.
#[derive(Clone, Debug)]
pub struct FixedProfile {
    /// Position on the simulation plane, in metres.
    pub location: Coord,

    /// The city this site belongs to, if any.
    pub city: Option<AreaId>,

    /// The district this site belongs to, if any.
    pub district: Option<AreaId>,

    /// Whether the site is open-air.
    pub is_outdoor: bool,

    /// How essential the site is to the economy/society, in [0, 1].
    /// Higher values mean closure policies should spare it longer.
    pub essentiality: f64,
}

impl FixedProfile {
    pub fn new(location: Coord) -> Self {
        Self {
            location,
            city:         None,
            district:     None,
            is_outdoor:   false,
            essentiality: 1.0,
        }
    }
}

// ── TransitLine ───────────────────────────────────────────────────────────────

/// The route, timetable, and runtime position of a transit vehicle.
///
/// A vehicle runs rounds over `path`: at each `start_times` entry it docks at
/// `path[0]`, then hops station to station taking `leg_minutes[k]` to cover
/// leg `k`.  Between stations the vehicle is nowhere (`current_station =
/// None`); people aboard stay occupants of the vehicle site the whole time.
#[derive(Clone, Debug)]
pub struct TransitLine {
    /// Stations visited in order.  World generation typically builds a
    /// round trip (out and back) so the line ends where it starts.
    pub path: Vec<SiteId>,

    /// `(weekday, minute-of-day)` entries at which the vehicle starts a round.
    pub start_times: Vec<(Weekday, f64)>,

    /// Minutes to travel each leg; `path.len() - 1` entries.
    pub leg_minutes: Vec<f64>,

    /// Where the vehicle is docked right now; `None` while between stations
    /// (or before its first round).
    pub current_station: Option<SiteId>,

    /// Index into `path` of the station being approached.  Meaningless while
    /// the vehicle is idle.
    pub next_stop: usize,

    /// When the vehicle reaches `path[next_stop]`.  `None` while idle.
    pub next_stop_time: Option<SimTime>,
}

impl TransitLine {
    /// A line at rest: not docked anywhere, waiting for its first start time.
    pub fn new(
        path:        Vec<SiteId>,
        start_times: Vec<(Weekday, f64)>,
        leg_minutes: Vec<f64>,
    ) -> Self {
        Self {
            path,
            start_times,
            leg_minutes,
            current_station: None,
            next_stop:       0,
            next_stop_time:  None,
        }
    }

    /// `true` while the vehicle is waiting for a start time.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.next_stop_time.is_none()
    }
}

// ── SiteKind ──────────────────────────────────────────────────────────────────

/// The placement variant of a site.
#[derive(Clone, Debug)]
pub enum SiteKind {
    /// The transit sentinel.  Exactly one exists per world, at
    /// [`SiteId::DUMMY`]; no infection events may occur there.
    Dummy,

    /// An immobile place: home, business, school, …
    Fixed(FixedProfile),

    /// A public transport station: an immobile place plus the lines serving it.
    Station {
        profile: FixedProfile,
        /// Transit vehicle sites whose path includes this station.
        lines:   Vec<SiteId>,
    },

    /// A public transport vehicle.  Has no fixed location; moves along its
    /// line's path according to the timetable.
    Transit(TransitLine),
}

// ── Site ──────────────────────────────────────────────────────────────────────

/// A place holding zero or more people.
///
/// The occupant vector is a derived index over `Person::site` and is only
/// mutated by the `World` membership operations.
#[derive(Clone, Debug)]
pub struct Site {
    /// Effective area in square metres.  Always > 0 for non-dummy sites.
    pub area_m2: f64,

    /// Typical maximum occupancy.  Does not block entry; only biases
    /// infection scoring.  Always > 0 for non-dummy sites.
    pub nominal_capacity: u32,

    /// Tendency of occupants to move around and mix.  Lower values mean
    /// people are relatively static.
    pub dispersion_factor: f64,

    /// Probability (0–100) of an occupant sampling a meeting this tick.
    /// Derived: recomputed from occupancy each tick, never accumulated.
    pub meeting_probability: f64,

    /// Placement variant.
    pub kind: SiteKind,

    occupants: Vec<PersonId>,
}

impl Site {
    fn new(area_m2: f64, nominal_capacity: u32, dispersion_factor: f64, kind: SiteKind) -> Self {
        Self {
            area_m2,
            nominal_capacity,
            dispersion_factor,
            meeting_probability: 0.0,
            kind,
            occupants: Vec::new(),
        }
    }

    /// An immobile site.
    pub fn fixed(
        area_m2:           f64,
        nominal_capacity:  u32,
        dispersion_factor: f64,
        profile:           FixedProfile,
    ) -> Self {
        Self::new(area_m2, nominal_capacity, dispersion_factor, SiteKind::Fixed(profile))
    }

    /// A transport station.  Serving lines are registered afterwards via
    /// [`World::register_line`][crate::World::register_line] once the vehicle
    /// sites exist.
    pub fn station(
        area_m2:           f64,
        nominal_capacity:  u32,
        dispersion_factor: f64,
        profile:           FixedProfile,
    ) -> Self {
        Self::new(
            area_m2,
            nominal_capacity,
            dispersion_factor,
            SiteKind::Station { profile, lines: Vec::new() },
        )
    }

    /// A transit vehicle.
    pub fn transit(
        area_m2:           f64,
        nominal_capacity:  u32,
        dispersion_factor: f64,
        line:              TransitLine,
    ) -> Self {
        Self::new(area_m2, nominal_capacity, dispersion_factor, SiteKind::Transit(line))
    }

    /// The transit sentinel.  Constructed once per world by `World::new`;
    /// its density parameters are never read.
    pub(crate) fn dummy() -> Self {
        Self::new(1.0, 1, 0.0, SiteKind::Dummy)
    }

    // ── Capability queries ────────────────────────────────────────────────

    /// `true` for the transit sentinel.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        matches!(self.kind, SiteKind::Dummy)
    }

    /// `true` if this site can change location (a transit vehicle).
    #[inline]
    pub fn is_mobile(&self) -> bool {
        matches!(self.kind, SiteKind::Transit(_))
    }

    /// Where a mobile site is docked right now.
    ///
    /// `None` for immobile sites, for vehicles between stations, and for
    /// vehicles that have not started a round yet.  The commuting engine
    /// derives destination reachability from this query alone.
    #[inline]
    pub fn docked_station(&self) -> Option<SiteId> {
        match &self.kind {
            SiteKind::Transit(line) => line.current_station,
            _ => None,
        }
    }

    /// The fixed placement data, if this site has one.
    pub fn fixed_profile(&self) -> Option<&FixedProfile> {
        match &self.kind {
            SiteKind::Fixed(profile) | SiteKind::Station { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// The transit line, if this site is a vehicle.
    pub fn transit_line(&self) -> Option<&TransitLine> {
        match &self.kind {
            SiteKind::Transit(line) => Some(line),
            _ => None,
        }
    }

    /// Mutable access to the transit line, if this site is a vehicle.
    pub fn transit_line_mut(&mut self) -> Option<&mut TransitLine> {
        match &mut self.kind {
            SiteKind::Transit(line) => Some(line),
            _ => None,
        }
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// People currently present, in no meaningful order.
    #[inline]
    pub fn occupants(&self) -> &[PersonId] {
        &self.occupants
    }

    #[inline]
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub(crate) fn add_occupant(&mut self, person: PersonId) {
        self.occupants.push(person);
    }

    pub(crate) fn remove_occupant(&mut self, person: PersonId) {
        if let Some(pos) = self.occupants.iter().position(|&p| p == person) {
            self.occupants.swap_remove(pos);
        }
    }

    // ── Meeting probability ───────────────────────────────────────────────

    /// Recompute the meeting probability from current occupancy.
    ///
    /// Zero below two occupants; otherwise the occupant density scaled by the
    /// dispersion factor, expressed as a percentage and clamped to 100.
    pub fn update_meeting_probability(&mut self) {
        let n = self.occupants.len();
        self.meeting_probability = if n < 2 {
            0.0
        } else {
            ((n as f64 * 10.0 / self.area_m2) * self.dispersion_factor * 100.0).min(100.0)
        };
    }
}
