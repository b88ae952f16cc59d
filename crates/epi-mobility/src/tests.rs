//! Unit tests for epi-mobility.

use epi_commute::CommutingPattern;
use epi_core::{Coord, PatternId, PersonId, SimRng, SimTime, SiteId, Weekday};
use epi_policy::{OpenPolicy, Policy};
use epi_world::{FixedProfile, Occupation, Person, Sex, Site, TransitLine, World};

use crate::{advance_people, advance_transit};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn profile_at(x: f64, y: f64) -> FixedProfile {
    FixedProfile::new(Coord::new(x, y))
}

fn resident(world: &mut World, site: SiteId, home: SiteId, patterns: Vec<PatternId>) -> PersonId {
    let household = world.add_household(home).unwrap();
    let mut person = Person::new(30.0, Sex::Male, Occupation::Worker);
    person.patterns = patterns;
    world.add_person(person, household, site).unwrap()
}

/// World with a home and an office, one resident at home.
fn commuter_setup(patterns: Vec<PatternId>) -> (World, SiteId, SiteId, PersonId) {
    let mut world = World::new();
    let home = world
        .add_site(Site::fixed(50.0, 4, 1.0, profile_at(0.0, 0.0)))
        .unwrap();
    let office = world
        .add_site(Site::fixed(200.0, 15, 1.0, profile_at(500.0, 0.0)))
        .unwrap();
    let person = resident(&mut world, home, home, patterns);
    (world, home, office, person)
}

/// A rule from `origins` to `destinations` that always fires, with fixed travel.
fn certain_rule(origins: Vec<SiteId>, destinations: Vec<SiteId>, travel: f64) -> CommutingPattern {
    CommutingPattern::builder(destinations)
        .origins(origins)
        .travel_minutes(travel)
        .probability_per_minute(1.0)
        .build()
        .unwrap()
}

fn morning() -> SimTime {
    SimTime::at(0, Weekday::Monday, 480.0)
}

struct DenyAll;

impl Policy for DenyAll {
    fn authorize_move(
        &self,
        _person: PersonId,
        _origin: SiteId,
        _destination: SiteId,
        _time: SimTime,
    ) -> bool {
        false
    }
}

// ── Movement state machine ────────────────────────────────────────────────────

#[cfg(test)]
mod state_machine {
    use super::*;

    #[test]
    fn no_firing_rule_accumulates_dwell() {
        let (mut world, _home, _office, person) = commuter_setup(vec![]);
        let mut rng = SimRng::new(1);
        advance_people(&mut world, &[], &OpenPolicy, morning(), 5.0, &mut rng);
        advance_people(&mut world, &[], &OpenPolicy, morning() + 5.0, 5.0, &mut rng);
        assert_eq!(world.person(person).dwell_minutes, 10.0);
        assert!(!world.person(person).is_in_transit());
    }

    #[test]
    fn future_arrival_enters_transit() {
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0)]);
        let patterns = vec![certain_rule(vec![home], vec![office], 30.0)];
        let mut rng = SimRng::new(1);

        advance_people(&mut world, &patterns, &OpenPolicy, morning(), 5.0, &mut rng);

        let p = world.person(person);
        assert_eq!(p.site, SiteId::DUMMY);
        assert_eq!(p.dwell_minutes, 0.0);
        let trip = p.trip.unwrap();
        assert_eq!(trip.destination, office);
        assert_eq!(trip.arrival, morning() + 30.0);
        assert_eq!(world.site(home).occupant_count(), 0);
        assert!(world.occupancy_consistent());
    }

    #[test]
    fn instantaneous_travel_bypasses_transit() {
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0)]);
        let patterns = vec![certain_rule(vec![home], vec![office], 0.0)];
        let mut rng = SimRng::new(1);

        advance_people(&mut world, &patterns, &OpenPolicy, morning(), 5.0, &mut rng);

        let p = world.person(person);
        assert_eq!(p.site, office);
        assert!(p.trip.is_none());
        assert_eq!(p.dwell_minutes, 0.0);
        assert_eq!(world.site(SiteId::DUMMY).occupant_count(), 0);
    }

    #[test]
    fn self_loop_rule_is_noop() {
        let (mut world, home, _office, person) = commuter_setup(vec![PatternId(0)]);
        let patterns = vec![certain_rule(vec![home], vec![home], 30.0)];
        let mut rng = SimRng::new(1);

        advance_people(&mut world, &patterns, &OpenPolicy, morning(), 5.0, &mut rng);

        let p = world.person(person);
        assert_eq!(p.site, home);
        assert!(p.trip.is_none());
        assert_eq!(p.dwell_minutes, 5.0);
    }

    #[test]
    fn transit_correctness_scenario() {
        // 30-minute journey at 5-minute ticks: in transit for 6 ticks
        // (while time < arrival), resident exactly when time ≥ arrival.
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0)]);
        let patterns = vec![certain_rule(vec![home], vec![office], 30.0)];
        let mut rng = SimRng::new(1);

        let departure = morning();
        let mut time = departure;
        let mut transit_ticks = 0;
        let mut arrival_time = None;

        for _ in 0..20 {
            advance_people(&mut world, &patterns, &OpenPolicy, time, 5.0, &mut rng);
            if world.person(person).is_in_transit() {
                transit_ticks += 1;
            } else if arrival_time.is_none() && world.person(person).site == office {
                arrival_time = Some(time);
            }
            time = time + 5.0;
        }

        assert_eq!(transit_ticks, 6); // ticks 480, 485, …, 505
        let arrived = arrival_time.expect("never arrived");
        let elapsed = arrived.since(departure);
        assert!((30.0..35.0).contains(&elapsed), "elapsed {elapsed}");
        assert_eq!(world.person(person).site, office);
        assert!(world.occupancy_consistent());
    }

    #[test]
    fn waiting_in_transit_accumulates_dwell() {
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0)]);
        let patterns = vec![certain_rule(vec![home], vec![office], 30.0)];
        let mut rng = SimRng::new(1);

        let mut time = morning();
        advance_people(&mut world, &patterns, &OpenPolicy, time, 5.0, &mut rng);
        assert_eq!(world.person(person).dwell_minutes, 0.0);

        // Five waiting ticks at 5 minutes each.
        for _ in 0..5 {
            time = time + 5.0;
            advance_people(&mut world, &patterns, &OpenPolicy, time, 5.0, &mut rng);
        }
        assert!(world.person(person).is_in_transit());
        assert_eq!(world.person(person).dwell_minutes, 25.0);

        // Arrival resets dwell again.
        time = time + 5.0;
        advance_people(&mut world, &patterns, &OpenPolicy, time, 5.0, &mut rng);
        assert_eq!(world.person(person).site, office);
        assert_eq!(world.person(person).dwell_minutes, 0.0);
    }

    #[test]
    fn first_matching_pattern_wins() {
        // Both rules are certain; only the first may ever take effect.
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0), PatternId(1)]);
        let marker = world
            .add_site(Site::fixed(80.0, 10, 1.0, profile_at(-500.0, 0.0)))
            .unwrap();
        let patterns = vec![
            certain_rule(vec![home], vec![office], 0.0),
            certain_rule(vec![home], vec![marker], 0.0),
        ];
        let mut rng = SimRng::new(1);

        advance_people(&mut world, &patterns, &OpenPolicy, morning(), 5.0, &mut rng);

        // The marker destination would prove the second rule was evaluated
        // for effect; it must never be reached.
        assert_eq!(world.person(person).site, office);
    }

    #[test]
    fn lower_priority_pattern_fires_when_first_fails() {
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0), PatternId(1)]);
        let marker = world
            .add_site(Site::fixed(80.0, 10, 1.0, profile_at(-500.0, 0.0)))
            .unwrap();
        let patterns = vec![
            // First rule's origin condition fails (person is at home).
            certain_rule(vec![office], vec![office], 0.0),
            certain_rule(vec![home], vec![marker], 0.0),
        ];
        let mut rng = SimRng::new(1);

        advance_people(&mut world, &patterns, &OpenPolicy, morning(), 5.0, &mut rng);

        assert_eq!(world.person(person).site, marker);
    }

    #[test]
    fn vetoed_move_stays_put() {
        let (mut world, home, office, person) = commuter_setup(vec![PatternId(0)]);
        let patterns = vec![certain_rule(vec![home], vec![office], 30.0)];
        let mut rng = SimRng::new(1);

        advance_people(&mut world, &patterns, &DenyAll, morning(), 5.0, &mut rng);

        let p = world.person(person);
        assert_eq!(p.site, home);
        assert!(p.trip.is_none());
        assert_eq!(p.dwell_minutes, 5.0);
    }

    #[test]
    fn same_seed_same_movement() {
        // Two people sharing one two-destination rule: the destinations each
        // ends up at depend only on the seed, not on anything ambient.
        let run = |seed: u64| -> (SiteId, SiteId) {
            let mut world = World::new();
            let home = world
                .add_site(Site::fixed(50.0, 4, 1.0, profile_at(0.0, 0.0)))
                .unwrap();
            let office_a = world
                .add_site(Site::fixed(200.0, 15, 1.0, profile_at(500.0, 0.0)))
                .unwrap();
            let office_b = world
                .add_site(Site::fixed(200.0, 15, 1.0, profile_at(0.0, 500.0)))
                .unwrap();
            let first = resident(&mut world, home, home, vec![PatternId(0)]);
            let second = resident(&mut world, home, home, vec![PatternId(0)]);
            let patterns = vec![certain_rule(vec![home], vec![office_a, office_b], 0.0)];

            let mut rng = SimRng::new(seed);
            advance_people(&mut world, &patterns, &OpenPolicy, morning(), 5.0, &mut rng);
            (world.person(first).site, world.person(second).site)
        };

        assert_eq!(run(9), run(9));
        assert_eq!(run(123), run(123));
    }
}

// ── Transit vehicles ──────────────────────────────────────────────────────────

#[cfg(test)]
mod vehicles {
    use super::*;

    /// Stations A and B with a one-leg line (10 minutes, Monday 08:00 start).
    fn line_setup() -> (World, SiteId, SiteId, SiteId) {
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

    #[test]
    fn docks_at_start_time() {
        let (mut world, station_a, _b, bus) = line_setup();
        // 07:55 — nothing yet.
        advance_transit(&mut world, SimTime::at(0, Weekday::Monday, 475.0), 5.0);
        assert_eq!(world.site(bus).docked_station(), None);
        // 08:00 falls in [480, 485): the round starts.
        advance_transit(&mut world, SimTime::at(0, Weekday::Monday, 480.0), 5.0);
        assert_eq!(world.site(bus).docked_station(), Some(station_a));
    }

    #[test]
    fn between_stations_is_nowhere() {
        let (mut world, _a, _b, bus) = line_setup();
        advance_transit(&mut world, SimTime::at(0, Weekday::Monday, 480.0), 5.0);
        advance_transit(&mut world, SimTime::at(0, Weekday::Monday, 485.0), 5.0);
        assert_eq!(world.site(bus).docked_station(), None);
        assert!(!world.site(bus).transit_line().unwrap().is_idle());
    }

    #[test]
    fn idles_docked_at_terminus() {
        let (mut world, _a, station_b, bus) = line_setup();
        for minute in [480.0, 485.0, 490.0] {
            advance_transit(&mut world, SimTime::at(0, Weekday::Monday, minute), 5.0);
        }
        assert_eq!(world.site(bus).docked_station(), Some(station_b));
        assert!(world.site(bus).transit_line().unwrap().is_idle());

        // Still idle later the same day.
        advance_transit(&mut world, SimTime::at(0, Weekday::Monday, 600.0), 5.0);
        assert_eq!(world.site(bus).docked_station(), Some(station_b));
    }

    #[test]
    fn empty_timetable_never_moves() {
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
                TransitLine::new(vec![station_a, station_b], vec![], vec![10.0]),
            ))
            .unwrap();

        for tick in 0..288 {
            advance_transit(&mut world, SimTime::from_minutes(tick as f64 * 5.0), 5.0);
        }
        assert_eq!(world.site(bus).docked_station(), None);
    }

    #[test]
    fn rider_boards_and_alights() {
        let (mut world, station_a, station_b, bus) = line_setup();
        let home = world
            .add_site(Site::fixed(50.0, 4, 1.0, profile_at(5.0, 5.0)))
            .unwrap();
        let person = resident(&mut world, station_a, home, vec![PatternId(0), PatternId(1)]);

        let patterns = vec![
            // Board the bus when it is docked here (instantaneous).
            certain_rule(vec![station_a], vec![bus], 0.0),
            // Get off at station B.
            certain_rule(vec![bus], vec![station_b], 0.0),
        ];
        let mut rng = SimRng::new(1);

        let mut time = SimTime::at(0, Weekday::Monday, 475.0);
        for _ in 0..5 {
            advance_transit(&mut world, time, 5.0);
            advance_people(&mut world, &patterns, &OpenPolicy, time, 5.0, &mut rng);
            time = time + 5.0;
        }

        // 475: bus absent, rider waits at A.  480: bus docks, rider boards.
        // 485: bus mid-leg, rider trapped aboard.  490: bus docks at B,
        // rider alights.
        assert_eq!(world.person(person).site, station_b);
        assert_eq!(world.site(bus).occupant_count(), 0);
        assert!(world.occupancy_consistent());
    }
}
