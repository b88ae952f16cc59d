//! Rule evaluation: `CommutingPattern::apply`.
//!
//! # Evaluation order
//!
//! Conditions short-circuit *before* the random trial so the trial keeps its
//! meaning — "the per-minute probability that this rule, given its
//! preconditions hold, fires".  Destination filtering happens after the
//! trial; since the trial and the filter are independent, this order yields
//! the same distribution as the reverse and is simpler to reason about.
//!
//! 1. origin condition        — person must be at one of the rule's origins
//! 2. weekday condition
//! 3. minute-of-day condition — inclusive interval on `60·hour + minute`
//! 4. minimum-dwell condition
//! 5. Bernoulli trial with `min(1, step · probability_per_minute)`
//! 6. reachability filter over the candidate destinations
//! 7. fail if nothing is reachable
//! 8. uniform choice among the reachable destinations
//! 9. travel-time evaluation
//! 10. result: `(destination, time + travel_time)`
//!
//! # Reachability
//!
//! Mobility is a capability, not a type: a site that `is_mobile()` can only
//! be entered or left where it is docked.
//!
//! - From aboard a vehicle, the only reachable destination is the vehicle's
//!   current station — and only if the rule lists it.
//! - From anywhere else, a vehicle is reachable only while docked exactly at
//!   the person's current site; immobile destinations are always reachable.

use epi_core::{SimRng, SimTime, SiteId};
use epi_world::World;

use crate::pattern::CommutingPattern;

/// The outcome of a fired rule: where to go and when the journey ends.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Commute {
    pub destination: SiteId,
    pub arrival: SimTime,
}

impl CommutingPattern {
    /// Evaluate this rule for a person at `current_site`.
    ///
    /// Returns `None` if any condition fails, the trial fails, or no listed
    /// destination is reachable.  Pure apart from draws on the shared stream:
    /// one Bernoulli trial (only when all conditions hold) and one uniform
    /// choice (only when the trial succeeds and candidates remain).
    pub fn apply(
        &self,
        world:         &World,
        current_site:  SiteId,
        time:          SimTime,
        dwell_minutes: f64,
        step_minutes:  f64,
        rng:           &mut SimRng,
    ) -> Option<Commute> {
        // ── 1–4: conditions, short-circuiting before any draw ─────────────
        if let Some(origins) = &self.origins {
            if !origins.contains(&current_site) {
                return None;
            }
        }
        if let Some(weekdays) = self.weekdays {
            if !weekdays.contains(time.weekday()) {
                return None;
            }
        }
        if let Some(window) = self.window {
            if !window.contains(time.minute_of_day()) {
                return None;
            }
        }
        if let Some(min_dwell) = self.min_dwell_minutes {
            if dwell_minutes < min_dwell {
                return None;
            }
        }

        // ── 5: the trigger trial, scaled to the tick length ───────────────
        let p = (step_minutes * self.probability_per_minute).min(1.0);
        if !rng.gen_bool(p) {
            return None;
        }

        // ── 6–7: reachable subset of the candidate destinations ───────────
        let reachable = self.reachable_destinations(world, current_site);
        if reachable.is_empty() {
            return None;
        }

        // ── 8–10: choose, time the journey, done ──────────────────────────
        let destination = *rng.choose(&reachable)?;
        let travel_minutes = self
            .travel_time
            .minutes(world.site(current_site), world.site(destination));

        Some(Commute {
            destination,
            arrival: time + travel_minutes,
        })
    }

    /// The subset of `destinations` a person at `current_site` can enter now.
    fn reachable_destinations(&self, world: &World, current_site: SiteId) -> Vec<SiteId> {
        let current = world.site(current_site);

        if current.is_mobile() {
            // Aboard a vehicle you can only get off at the docked station.
            return match current.docked_station() {
                Some(station) if self.destinations.contains(&station) => vec![station],
                _ => Vec::new(),
            };
        }

        self.destinations
            .iter()
            .copied()
            .filter(|&candidate| {
                let site = world.site(candidate);
                // A vehicle can be boarded only where it is docked.
                !site.is_mobile() || site.docked_station() == Some(current_site)
            })
            .collect()
    }
}
