//! Unit tests for epi-commute.

use std::sync::Arc;

use epi_core::{Coord, SimRng, SimTime, SiteId, Weekday};
use epi_world::{FixedProfile, Site, TransitLine, World};

use crate::{CommutingPattern, MinuteWindow, PatternError, TravelTime, WeekdaySet};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn profile_at(x: f64, y: f64) -> FixedProfile {
    FixedProfile::new(Coord::new(x, y))
}

/// World with two fixed sites 600 m apart.
fn two_site_world() -> (World, SiteId, SiteId) {
    let mut world = World::new();
    let home = world
        .add_site(Site::fixed(50.0, 4, 1.0, profile_at(0.0, 0.0)))
        .unwrap();
    let office = world
        .add_site(Site::fixed(200.0, 15, 1.0, profile_at(600.0, 0.0)))
        .unwrap();
    (world, home, office)
}

/// World with two stations and one vehicle whose path runs between them.
fn transit_world() -> (World, SiteId, SiteId, SiteId) {
    let mut world = World::new();
    let station_a = world
        .add_site(Site::station(10.0, 20, 1.0, profile_at(0.0, 0.0)))
        .unwrap();
    let station_b = world
        .add_site(Site::station(10.0, 20, 1.0, profile_at(0.0, 900.0)))
        .unwrap();
    let bus = world
        .add_site(Site::transit(
            8.0,
            10,
            1.0,
            TransitLine::new(
                vec![station_a, station_b],
                vec![(Weekday::Monday, 480.0)],
                vec![10.0],
            ),
        ))
        .unwrap();
    world.register_line(station_a, bus).unwrap();
    world.register_line(station_b, bus).unwrap();
    (world, station_a, station_b, bus)
}

/// A rule that always fires when its conditions hold (certain trial).
fn certain(destinations: Vec<SiteId>) -> crate::CommutingPatternBuilder {
    CommutingPattern::builder(destinations)
        .travel_minutes(30.0)
        .probability_per_minute(1.0)
}

fn monday_morning() -> SimTime {
    SimTime::at(0, Weekday::Monday, 500.0)
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn empty_destinations_rejected() {
        let result = CommutingPattern::builder(Vec::<SiteId>::new())
            .travel_minutes(10.0)
            .probability_per_minute(0.01)
            .build();
        assert!(matches!(result, Err(PatternError::EmptyDestinations)));
    }

    #[test]
    fn empty_origins_rejected() {
        let result = CommutingPattern::builder(vec![SiteId(1)])
            .origins(Vec::<SiteId>::new())
            .travel_minutes(10.0)
            .probability_per_minute(0.01)
            .build();
        assert!(matches!(result, Err(PatternError::EmptyOrigins)));
    }

    #[test]
    fn missing_travel_time_rejected() {
        let result = CommutingPattern::builder(vec![SiteId(1)])
            .probability_per_minute(0.01)
            .build();
        assert!(matches!(result, Err(PatternError::MissingTravelTime)));
    }

    #[test]
    fn missing_probability_rejected() {
        let result = CommutingPattern::builder(vec![SiteId(1)])
            .travel_minutes(10.0)
            .build();
        assert!(matches!(result, Err(PatternError::MissingProbability)));
    }

    #[test]
    fn negative_probability_rejected() {
        let result = CommutingPattern::builder(vec![SiteId(1)])
            .travel_minutes(10.0)
            .probability_per_minute(-0.5)
            .build();
        assert!(matches!(result, Err(PatternError::InvalidProbability(_))));
    }

    #[test]
    fn inverted_window_rejected() {
        let result = CommutingPattern::builder(vec![SiteId(1)])
            .window(540.0, 480.0)
            .travel_minutes(10.0)
            .probability_per_minute(0.01)
            .build();
        assert!(matches!(result, Err(PatternError::InvalidWindow { .. })));
    }

    #[test]
    fn negative_fixed_travel_rejected() {
        let result = CommutingPattern::builder(vec![SiteId(1)])
            .travel_minutes(-5.0)
            .probability_per_minute(0.01)
            .build();
        assert!(matches!(result, Err(PatternError::InvalidTravelTime(_))));
    }

    #[test]
    fn chained_rules_share_endpoint_lists() {
        let workplaces: Arc<[SiteId]> = vec![SiteId(3), SiteId(4)].into();
        let outbound = CommutingPattern::builder(workplaces.clone())
            .travel_minutes(20.0)
            .probability_per_minute(0.01)
            .build()
            .unwrap();
        let inbound = CommutingPattern::builder(vec![SiteId(1)])
            .origins(workplaces.clone())
            .travel_minutes(20.0)
            .probability_per_minute(0.04)
            .build()
            .unwrap();

        // The outbound rule's destinations ARE the inbound rule's origins.
        assert!(Arc::ptr_eq(
            &outbound.destinations,
            inbound.origins.as_ref().unwrap()
        ));
    }
}

// ── Small condition types ─────────────────────────────────────────────────────

#[cfg(test)]
mod condition_types {
    use super::*;

    #[test]
    fn weekday_set_membership() {
        let set = WeekdaySet::of(&[Weekday::Monday, Weekday::Saturday]);
        assert!(set.contains(Weekday::Monday));
        assert!(set.contains(Weekday::Saturday));
        assert!(!set.contains(Weekday::Sunday));
        assert!(!WeekdaySet::of(&[]).contains(Weekday::Monday));
        assert!(WeekdaySet::of(&[]).is_empty());
    }

    #[test]
    fn workweek_excludes_weekend() {
        assert!(WeekdaySet::WORKWEEK.contains(Weekday::Friday));
        assert!(!WeekdaySet::WORKWEEK.contains(Weekday::Saturday));
        assert!(!WeekdaySet::WORKWEEK.contains(Weekday::Sunday));
    }

    #[test]
    fn minute_window_is_inclusive() {
        let window = MinuteWindow { start: 480.0, end: 540.0 };
        assert!(window.contains(480.0));
        assert!(window.contains(540.0));
        assert!(window.contains(510.0));
        assert!(!window.contains(479.9));
        assert!(!window.contains(540.1));
    }
}

// ── Condition gating ──────────────────────────────────────────────────────────

#[cfg(test)]
mod conditions {
    use super::*;

    #[test]
    fn wrong_origin_fails() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office]).origins(vec![office]).build().unwrap();
        let mut rng = SimRng::new(1);
        assert!(rule
            .apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
            .is_none());
    }

    #[test]
    fn matching_origin_fires() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office]).origins(vec![home]).build().unwrap();
        let mut rng = SimRng::new(1);
        let commute = rule
            .apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
            .unwrap();
        assert_eq!(commute.destination, office);
    }

    #[test]
    fn wrong_weekday_fails() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office])
            .weekdays(WeekdaySet::WORKWEEK)
            .build()
            .unwrap();
        let sunday = SimTime::at(0, Weekday::Sunday, 500.0);
        let mut rng = SimRng::new(1);
        assert!(rule.apply(&world, home, sunday, 0.0, 5.0, &mut rng).is_none());
        assert!(rule
            .apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
            .is_some());
    }

    #[test]
    fn outside_window_fails() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office]).window(480.0, 540.0).build().unwrap();
        let mut rng = SimRng::new(1);

        let too_early = SimTime::at(0, Weekday::Monday, 479.0);
        assert!(rule.apply(&world, home, too_early, 0.0, 5.0, &mut rng).is_none());

        // Both bounds are inclusive.
        let at_start = SimTime::at(0, Weekday::Monday, 480.0);
        assert!(rule.apply(&world, home, at_start, 0.0, 5.0, &mut rng).is_some());
        let at_end = SimTime::at(0, Weekday::Monday, 540.0);
        assert!(rule.apply(&world, home, at_end, 0.0, 5.0, &mut rng).is_some());
    }

    #[test]
    fn min_dwell_boundary() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office]).min_dwell(60.0).build().unwrap();
        let mut rng = SimRng::new(1);

        assert!(rule
            .apply(&world, home, monday_morning(), 59.9, 5.0, &mut rng)
            .is_none());
        // Exactly the threshold satisfies the condition.
        assert!(rule
            .apply(&world, home, monday_morning(), 60.0, 5.0, &mut rng)
            .is_some());
    }
}

// ── The trigger trial ─────────────────────────────────────────────────────────

#[cfg(test)]
mod trial {
    use super::*;

    #[test]
    fn zero_probability_never_fires() {
        let (world, home, office) = two_site_world();
        let rule = CommutingPattern::builder(vec![office])
            .travel_minutes(30.0)
            .probability_per_minute(0.0)
            .build()
            .unwrap();
        let mut rng = SimRng::new(1);
        for _ in 0..200 {
            assert!(rule
                .apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
                .is_none());
        }
    }

    #[test]
    fn probability_scales_with_step_and_caps() {
        // 0.5/min at a 2-minute step → min(1, 1.0) = certainty.
        let (world, home, office) = two_site_world();
        let rule = CommutingPattern::builder(vec![office])
            .travel_minutes(30.0)
            .probability_per_minute(0.5)
            .build()
            .unwrap();
        let mut rng = SimRng::new(1);
        for _ in 0..50 {
            assert!(rule
                .apply(&world, home, monday_morning(), 0.0, 2.0, &mut rng)
                .is_some());
        }
    }

    #[test]
    fn firing_rate_tracks_step_scaling() {
        // 0.01/min at a 5-minute step → 5% per tick.
        let (world, home, office) = two_site_world();
        let rule = CommutingPattern::builder(vec![office])
            .travel_minutes(30.0)
            .probability_per_minute(0.01)
            .build()
            .unwrap();
        let mut rng = SimRng::new(42);
        let fired = (0..10_000)
            .filter(|_| {
                rule.apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
                    .is_some()
            })
            .count();
        // Binomial(10000, 0.05): mean 500, σ ≈ 21.8.  ±5σ keeps the seeded
        // run comfortably inside while still catching a mis-scaled trial.
        assert!((400..=600).contains(&fired), "fired {fired} of 10000");
    }
}

// ── Reachability ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod reachability {
    use super::*;

    #[test]
    fn undocked_vehicle_is_unreachable() {
        let (world, station_a, _station_b, bus) = transit_world();
        let rule = certain(vec![bus]).build().unwrap();
        let mut rng = SimRng::new(1);
        // Vehicle has not started a round: not docked anywhere.
        assert!(rule
            .apply(&world, station_a, monday_morning(), 0.0, 5.0, &mut rng)
            .is_none());
    }

    #[test]
    fn vehicle_docked_here_is_boardable() {
        let (mut world, station_a, _station_b, bus) = transit_world();
        world
            .site_mut(bus)
            .transit_line_mut()
            .unwrap()
            .current_station = Some(station_a);

        let rule = certain(vec![bus]).build().unwrap();
        let mut rng = SimRng::new(1);
        let commute = rule
            .apply(&world, station_a, monday_morning(), 0.0, 5.0, &mut rng)
            .unwrap();
        assert_eq!(commute.destination, bus);
    }

    #[test]
    fn vehicle_docked_elsewhere_is_not_boardable() {
        let (mut world, station_a, station_b, bus) = transit_world();
        world
            .site_mut(bus)
            .transit_line_mut()
            .unwrap()
            .current_station = Some(station_b);

        let rule = certain(vec![bus]).build().unwrap();
        let mut rng = SimRng::new(1);
        assert!(rule
            .apply(&world, station_a, monday_morning(), 0.0, 5.0, &mut rng)
            .is_none());
    }

    #[test]
    fn aboard_vehicle_only_docked_station_reachable() {
        let (mut world, station_a, station_b, bus) = transit_world();
        world
            .site_mut(bus)
            .transit_line_mut()
            .unwrap()
            .current_station = Some(station_b);

        // Rule lists both stations; only the docked one is reachable.
        let rule = certain(vec![station_a, station_b]).build().unwrap();
        let mut rng = SimRng::new(1);
        let commute = rule
            .apply(&world, bus, monday_morning(), 0.0, 5.0, &mut rng)
            .unwrap();
        assert_eq!(commute.destination, station_b);
    }

    #[test]
    fn aboard_moving_vehicle_nothing_reachable() {
        let (world, station_a, station_b, bus) = transit_world();
        // current_station is None (between stations).
        let rule = certain(vec![station_a, station_b]).build().unwrap();
        let mut rng = SimRng::new(1);
        assert!(rule
            .apply(&world, bus, monday_morning(), 0.0, 5.0, &mut rng)
            .is_none());
    }

    #[test]
    fn aboard_vehicle_unlisted_station_fails() {
        let (mut world, station_a, station_b, bus) = transit_world();
        world
            .site_mut(bus)
            .transit_line_mut()
            .unwrap()
            .current_station = Some(station_b);

        // Rule only lists station A, but the vehicle is docked at B.
        let rule = certain(vec![station_a]).build().unwrap();
        let mut rng = SimRng::new(1);
        assert!(rule
            .apply(&world, bus, monday_morning(), 0.0, 5.0, &mut rng)
            .is_none());
    }

    #[test]
    fn immobile_destinations_always_reachable() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office]).build().unwrap();
        let mut rng = SimRng::new(1);
        assert!(rule
            .apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
            .is_some());
    }
}

// ── Travel time ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod travel {
    use super::*;

    #[test]
    fn fixed_travel_sets_arrival() {
        let (world, home, office) = two_site_world();
        let rule = certain(vec![office]).build().unwrap(); // 30 fixed minutes
        let mut rng = SimRng::new(1);
        let now = monday_morning();
        let commute = rule.apply(&world, home, now, 0.0, 5.0, &mut rng).unwrap();
        assert_eq!(commute.arrival, now + 30.0);
    }

    #[test]
    fn computed_travel_uses_site_distance() {
        // 600 m apart at 60 m/min → 10 minutes.
        let (world, home, office) = two_site_world();
        let rule = CommutingPattern::builder(vec![office])
            .travel_time(TravelTime::from_speed(60.0))
            .probability_per_minute(1.0)
            .build()
            .unwrap();
        let mut rng = SimRng::new(1);
        let now = monday_morning();
        let commute = rule.apply(&world, home, now, 0.0, 5.0, &mut rng).unwrap();
        assert!((commute.arrival.since(now) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn boarding_a_docked_vehicle_is_instant() {
        let (mut world, station_a, _station_b, bus) = transit_world();
        world
            .site_mut(bus)
            .transit_line_mut()
            .unwrap()
            .current_station = Some(station_a);

        let rule = CommutingPattern::builder(vec![bus])
            .travel_time(TravelTime::from_speed(60.0))
            .probability_per_minute(1.0)
            .build()
            .unwrap();
        let mut rng = SimRng::new(1);
        let now = monday_morning();
        let commute = rule
            .apply(&world, station_a, now, 0.0, 5.0, &mut rng)
            .unwrap();
        assert_eq!(commute.destination, bus);
        assert_eq!(commute.arrival, now); // zero travel: vehicle has no fixed profile
    }

    #[test]
    fn uniform_choice_covers_all_destinations() {
        let (mut world, home, office) = two_site_world();
        let shop = world
            .add_site(Site::fixed(120.0, 10, 1.0, profile_at(-300.0, 100.0)))
            .unwrap();

        let rule = certain(vec![office, shop]).build().unwrap();
        let mut rng = SimRng::new(7);
        let mut chose_office = false;
        let mut chose_shop = false;
        for _ in 0..100 {
            let commute = rule
                .apply(&world, home, monday_morning(), 0.0, 5.0, &mut rng)
                .unwrap();
            match commute.destination {
                d if d == office => chose_office = true,
                d if d == shop => chose_shop = true,
                other => panic!("unexpected destination {other}"),
            }
        }
        assert!(chose_office && chose_shop);
    }
}
