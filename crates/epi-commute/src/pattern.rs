//! The `CommutingPattern` rule type and its builder.
//!
//! # Sharing
//!
//! Patterns are immutable after construction and referenced (not owned) by
//! people, so one rule can serve many people.  Destination and origin lists
//! are `Arc<[SiteId]>`: a multi-leg commute is a chain of rules whose
//! endpoint lists are literally shared — rule *k*'s destinations are rule
//! *k+1*'s origins, cloned by reference at construction time and never
//! mutated afterwards.

use std::fmt;
use std::sync::Arc;

use epi_core::{SiteId, Weekday, MINUTES_PER_DAY};
use epi_world::Site;

use crate::{PatternError, PatternResult};

// ── WeekdaySet ────────────────────────────────────────────────────────────────

/// A set of weekdays, stored as a 7-bit mask.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Every day of the week.
    pub const ALL: WeekdaySet = WeekdaySet(0x7f);

    /// Monday through Friday.
    pub const WORKWEEK: WeekdaySet = WeekdaySet(0b0001_1111);

    /// Build a set from explicit days.
    pub fn of(days: &[Weekday]) -> WeekdaySet {
        let mut mask = 0u8;
        for day in days {
            mask |= 1 << day.index();
        }
        WeekdaySet(mask)
    }

    #[inline]
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ── MinuteWindow ──────────────────────────────────────────────────────────────

/// An inclusive minute-of-day interval, e.g. `[480, 540]` = 08:00–09:00.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct MinuteWindow {
    pub start: f64,
    pub end: f64,
}

impl MinuteWindow {
    /// `true` if `minute_of_day` lies within the inclusive bounds.
    #[inline]
    pub fn contains(self, minute_of_day: f64) -> bool {
        self.start <= minute_of_day && minute_of_day <= self.end
    }
}

// ── TravelTime ────────────────────────────────────────────────────────────────

/// Signature of a computed travel time: minutes from origin to destination.
pub type TravelTimeFn = dyn Fn(&Site, &Site) -> f64 + Send + Sync;

/// How long a rule's journey takes: a constant, or a function of the origin
/// and destination sites.
#[derive(Clone)]
pub enum TravelTime {
    /// A constant number of minutes.
    Fixed(f64),
    /// Evaluated with `(origin, destination)` when the rule fires.
    Computed(Arc<TravelTimeFn>),
}

impl TravelTime {
    /// Travel minutes for a journey from `origin` to `destination`.
    pub fn minutes(&self, origin: &Site, destination: &Site) -> f64 {
        match self {
            TravelTime::Fixed(minutes) => *minutes,
            TravelTime::Computed(f) => f(origin, destination),
        }
    }

    /// A computed travel time derived from the planar distance between two
    /// fixed sites at `metres_per_minute`.  Journeys involving a site with
    /// no fixed location (a vehicle, or the sentinel) take zero minutes —
    /// boarding a docked vehicle is instantaneous.
    pub fn from_speed(metres_per_minute: f64) -> TravelTime {
        TravelTime::Computed(Arc::new(move |origin: &Site, destination: &Site| {
            match (origin.fixed_profile(), destination.fixed_profile()) {
                (Some(a), Some(b)) => a.location.distance_m(b.location) / metres_per_minute,
                _ => 0.0,
            }
        }))
    }
}

impl fmt::Debug for TravelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TravelTime::Fixed(minutes) => write!(f, "Fixed({minutes})"),
            TravelTime::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ── CommutingPattern ──────────────────────────────────────────────────────────

/// An immutable relocation rule.
///
/// All conditions are optional; an absent condition always holds.  The rule
/// fires when every present condition holds *and* a Bernoulli trial with
/// per-tick probability `min(1, step_minutes · probability_per_minute)`
/// succeeds.  See [`CommutingPattern::apply`] for the full evaluation order.
///
/// Construct only through [`CommutingPattern::builder`]; direct construction
/// would bypass the fail-fast validation.
#[derive(Clone, Debug)]
pub struct CommutingPattern {
    /// Fire only if the person currently occupies one of these sites.
    pub origins: Option<Arc<[SiteId]>>,

    /// Fire only on these weekdays.
    pub weekdays: Option<WeekdaySet>,

    /// Fire only within this minute-of-day interval (inclusive).
    pub window: Option<MinuteWindow>,

    /// Fire only after at least this long in the current site.
    pub min_dwell_minutes: Option<f64>,

    /// Candidate destinations; one reachable member is chosen uniformly.
    pub destinations: Arc<[SiteId]>,

    /// How long the journey takes.
    pub travel_time: TravelTime,

    /// Per-minute trigger probability, scaled by the tick length.
    pub probability_per_minute: f64,
}

impl CommutingPattern {
    /// Start building a rule with the given candidate destinations.
    pub fn builder(destinations: impl Into<Arc<[SiteId]>>) -> CommutingPatternBuilder {
        CommutingPatternBuilder::new(destinations)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`CommutingPattern`].
///
/// # Required inputs
///
/// Destinations (constructor), a travel time, and a trigger probability.
/// Everything else defaults to "no condition".
///
/// # Example
///
/// ```rust,ignore
/// let to_work = CommutingPattern::builder(workplaces.clone())
///     .origins(vec![home])
///     .weekdays(WeekdaySet::WORKWEEK)
///     .window(480.0, 540.0)
///     .travel_minutes(35.0)
///     .probability_per_minute(0.01)
///     .build()?;
/// ```
pub struct CommutingPatternBuilder {
    origins:                Option<Arc<[SiteId]>>,
    weekdays:               Option<WeekdaySet>,
    window:                 Option<MinuteWindow>,
    min_dwell_minutes:      Option<f64>,
    destinations:           Arc<[SiteId]>,
    travel_time:            Option<TravelTime>,
    probability_per_minute: Option<f64>,
}

impl CommutingPatternBuilder {
    pub fn new(destinations: impl Into<Arc<[SiteId]>>) -> Self {
        Self {
            origins:                None,
            weekdays:               None,
            window:                 None,
            min_dwell_minutes:      None,
            destinations:           destinations.into(),
            travel_time:            None,
            probability_per_minute: None,
        }
    }

    /// Restrict the rule to people currently at one of `origins`.
    pub fn origins(mut self, origins: impl Into<Arc<[SiteId]>>) -> Self {
        self.origins = Some(origins.into());
        self
    }

    /// Restrict the rule to the given weekdays.
    pub fn weekdays(mut self, days: WeekdaySet) -> Self {
        self.weekdays = Some(days);
        self
    }

    /// Restrict the rule to the inclusive minute-of-day interval
    /// `[start, end]`.
    pub fn window(mut self, start: f64, end: f64) -> Self {
        self.window = Some(MinuteWindow { start, end });
        self
    }

    /// Require at least `minutes` of dwell time in the current site.
    pub fn min_dwell(mut self, minutes: f64) -> Self {
        self.min_dwell_minutes = Some(minutes);
        self
    }

    /// Use a constant travel time.
    pub fn travel_minutes(mut self, minutes: f64) -> Self {
        self.travel_time = Some(TravelTime::Fixed(minutes));
        self
    }

    /// Use an arbitrary travel time (constant or computed).
    pub fn travel_time(mut self, travel_time: TravelTime) -> Self {
        self.travel_time = Some(travel_time);
        self
    }

    /// Set the per-minute trigger probability.
    pub fn probability_per_minute(mut self, p: f64) -> Self {
        self.probability_per_minute = Some(p);
        self
    }

    /// Validate and produce the immutable rule.
    pub fn build(self) -> PatternResult<CommutingPattern> {
        if self.destinations.is_empty() {
            return Err(PatternError::EmptyDestinations);
        }
        if let Some(origins) = &self.origins {
            if origins.is_empty() {
                return Err(PatternError::EmptyOrigins);
            }
        }
        if let Some(window) = self.window {
            let valid = window.start.is_finite()
                && window.end.is_finite()
                && 0.0 <= window.start
                && window.start <= window.end
                && window.end < MINUTES_PER_DAY;
            if !valid {
                return Err(PatternError::InvalidWindow {
                    start: window.start,
                    end:   window.end,
                });
            }
        }
        if let Some(dwell) = self.min_dwell_minutes {
            if !(dwell.is_finite() && dwell >= 0.0) {
                return Err(PatternError::InvalidMinDwell(dwell));
            }
        }

        let travel_time = self.travel_time.ok_or(PatternError::MissingTravelTime)?;
        if let TravelTime::Fixed(minutes) = travel_time {
            if !(minutes.is_finite() && minutes >= 0.0) {
                return Err(PatternError::InvalidTravelTime(minutes));
            }
        }

        let probability = self
            .probability_per_minute
            .ok_or(PatternError::MissingProbability)?;
        if !(probability.is_finite() && probability >= 0.0) {
            return Err(PatternError::InvalidProbability(probability));
        }

        Ok(CommutingPattern {
            origins:                self.origins,
            weekdays:               self.weekdays,
            window:                 self.window,
            min_dwell_minutes:      self.min_dwell_minutes,
            destinations:           self.destinations,
            travel_time,
            probability_per_minute: probability,
        })
    }
}
