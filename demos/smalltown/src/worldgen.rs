//! Synthetic town generation.
//!
//! Builds a small town — homes, businesses, transport stations, transit
//! lines, households, and commuters — with distributions crude enough to be
//! obviously synthetic.  Swap this module for shapefile/census loaders to
//! run against a real place; the simulation crates don't care.

use std::sync::Arc;

use anyhow::Result;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand_distr::Normal;

use epi_commute::{CommutingPattern, TravelTime, WeekdaySet};
use epi_core::{Coord, PatternId, SimRng, SiteId, Weekday};
use epi_world::{
    BoundedArea, FixedProfile, Occupation, Person, Sex, Site, SiteKind, TransitLine, World,
};

/// Walking pace used for the transit chain's computed travel times.
const WALK_SPEED_M_PER_MIN: f64 = 80.0;

// ── Configuration ─────────────────────────────────────────────────────────────

pub struct TownConfig {
    pub homes:             usize,
    pub businesses:        usize,
    pub stations:          usize,
    pub transit_lines:     usize,
    pub stations_per_line: usize,
    /// Fraction of workers who commute via public transport (when lines
    /// exist); the rest drive.
    pub transit_share:     f64,
    /// Fraction of the population initially ill.
    pub initial_ill:       f64,
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            homes:             120,
            businesses:        10,
            stations:          6,
            transit_lines:     2,
            stations_per_line: 4,
            transit_share:     0.3,
            initial_ill:       0.02,
        }
    }
}

/// A generated town, ready for `SimBuilder`.
pub struct Town {
    pub world:      World,
    pub patterns:   Vec<CommutingPattern>,
    pub homes:      Vec<SiteId>,
    pub businesses: Vec<SiteId>,
    pub stations:   Vec<SiteId>,
    pub lines:      Vec<SiteId>,
}

// ── Generation ────────────────────────────────────────────────────────────────

/// Build the whole town from `config`, drawing on `rng`.
pub fn generate(config: &TownConfig, rng: &mut SimRng) -> Result<Town> {
    let mut world = World::new();
    let mut patterns: Vec<CommutingPattern> = Vec::new();

    let city = world.add_area(BoundedArea::default());
    let district = world.add_area(BoundedArea::default());

    // ── Homes: small, residential, spread uniformly over the plane ────────
    let mut homes = Vec::with_capacity(config.homes);
    for _ in 0..config.homes {
        let mut profile = FixedProfile::new(Coord::new(
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
        ));
        profile.city = Some(city);
        profile.district = Some(district);

        let home = world.add_site(Site::fixed(
            rng.gen_range(40.0..60.0),
            rng.gen_range(3..=6),
            1.0,
            profile,
        ))?;
        world.area_mut(city).sites.push(home);
        world.area_mut(district).sites.push(home);
        homes.push(home);
    }

    // ── Businesses: bigger, denser toward the town centre ─────────────────
    let centre_spread = Normal::new(0.0, 100.0)?;
    let mut businesses = Vec::with_capacity(config.businesses);
    for _ in 0..config.businesses {
        let mut profile = FixedProfile::new(Coord::new(
            centre_spread.sample(rng.inner()),
            centre_spread.sample(rng.inner()),
        ));
        profile.city = Some(city);
        profile.district = Some(district);
        profile.essentiality = rng.gen_range(0.0..1.0);

        let business = world.add_site(Site::fixed(
            rng.gen_range(100.0..300.0),
            rng.gen_range(10..=20),
            1.0,
            profile,
        ))?;
        world.area_mut(city).sites.push(business);
        world.area_mut(district).sites.push(business);
        businesses.push(business);
    }

    // ── Transport stations: small open-air platforms ──────────────────────
    let mut stations = Vec::with_capacity(config.stations);
    for _ in 0..config.stations {
        let mut profile = FixedProfile::new(Coord::new(
            rng.gen_range(-300.0..300.0),
            rng.gen_range(-300.0..300.0),
        ));
        profile.city = Some(city);
        profile.district = Some(district);
        profile.is_outdoor = true;
        profile.essentiality = 0.2;

        let station = world.add_site(Site::station(
            rng.gen_range(5.0..20.0),
            rng.gen_range(10..=30),
            1.0,
            profile,
        ))?;
        stations.push(station);
    }

    // ── Transit lines: round trips over a shuffled station subset ─────────
    let mut lines = Vec::with_capacity(config.transit_lines);
    if stations.len() >= 2 {
        for _ in 0..config.transit_lines {
            let mut shuffled = stations.clone();
            rng.shuffle(&mut shuffled);
            shuffled.truncate(config.stations_per_line.max(2).min(shuffled.len()));

            // Out and back: A B C → A B C B A.
            let mut path = shuffled.clone();
            path.extend(shuffled.iter().rev().skip(1));

            // Weekday departures every two hours, 07:00–19:00.
            let mut start_times = Vec::new();
            for &day in &Weekday::ALL[..5] {
                let mut minute = 420.0;
                while minute < 1_200.0 {
                    start_times.push((day, minute));
                    minute += 120.0;
                }
            }

            let leg_minutes = vec![10.0; path.len() - 1];
            let line = world.add_site(Site::transit(
                rng.gen_range(5.0..10.0),
                rng.gen_range(4..=10),
                1.0,
                TransitLine::new(path, start_times, leg_minutes),
            ))?;
            for &station in &shuffled {
                world.register_line(station, line)?;
            }
            lines.push(line);
        }
    }

    // ── Households and people ─────────────────────────────────────────────
    let household_size = WeightedIndex::new([0.05, 0.1, 0.2, 0.3, 0.25, 0.1])?;
    for &home in &homes {
        let household = world.add_household(home)?;
        let size = household_size.sample(rng.inner()) + 1;

        for slot in 0..size {
            let age = match slot {
                0 => rng.gen_range(20.0..80.0), // first resident is an adult
                1 => rng.gen_range(0.0..80.0),
                _ => rng.gen_range(0.0..20.0),
            };
            let sex = if rng.gen_bool(0.5) { Sex::Female } else { Sex::Male };
            let occupation = match age {
                a if (18.0..=70.0).contains(&a) => Occupation::Worker,
                a if (5.0..18.0).contains(&a) => Occupation::Student,
                _ => Occupation::Unemployed,
            };

            let mut person = Person::new(age, sex, occupation);
            person.susceptibility_degree = 1.0;
            if rng.gen_bool(config.initial_ill) {
                person.illness_degree = 1.0;
                person.symptoms_degree = rng.gen_range(0.0..1.0);
                person.infected_minutes = Some(rng.gen_range(0.0..10_000.0));
            }
            // Seed some dwell so the first morning's minimum-dwell rules can
            // already fire.
            person.dwell_minutes = 300.0;

            if person.occupation == Occupation::Worker && !businesses.is_empty() {
                let uses_transit =
                    !lines.is_empty() && !stations.is_empty() && rng.gen_bool(config.transit_share);
                person.patterns = if uses_transit {
                    transit_commute(&world, &mut patterns, rng, home, &businesses, &stations)
                } else {
                    car_commute(&mut patterns, rng, home, &businesses)
                };
            }

            world.add_person(person, household, home)?;
        }
    }

    Ok(Town {
        world,
        patterns,
        homes,
        businesses,
        stations,
        lines,
    })
}

// ── Commuting chains ──────────────────────────────────────────────────────────

fn push(patterns: &mut Vec<CommutingPattern>, pattern: CommutingPattern) -> PatternId {
    patterns.push(pattern);
    PatternId(patterns.len() as u32 - 1)
}

/// A one-element shared destination list.  `sites` must be non-empty.
fn choose_one(rng: &mut SimRng, sites: &[SiteId]) -> Arc<[SiteId]> {
    let site = *rng.choose(sites).unwrap_or(&sites[0]);
    Arc::from(vec![site])
}

/// The two-rule car commute: leave for work in the morning window, head home
/// after a nine-hour shift.  The workplace list is shared between the rules.
fn car_commute(
    patterns:   &mut Vec<CommutingPattern>,
    rng:        &mut SimRng,
    home:       SiteId,
    businesses: &[SiteId],
) -> Vec<PatternId> {
    let home_sites: Arc<[SiteId]> = Arc::from(vec![home]);
    let workplace = choose_one(rng, businesses);
    let travel = rng.gen_range(20.0..50.0);

    let to_work = CommutingPattern::builder(workplace.clone())
        .origins(home_sites.clone())
        .weekdays(WeekdaySet::of(&Weekday::ALL[..6]))
        .window(480.0, 540.0)
        .travel_minutes(travel)
        .probability_per_minute(0.01)
        .build()
        .expect("car commute rule is statically well-formed");

    let to_home = CommutingPattern::builder(home_sites)
        .origins(workplace)
        .min_dwell(540.0)
        .travel_minutes(travel)
        .probability_per_minute(0.04)
        .build()
        .expect("car commute rule is statically well-formed");

    vec![push(patterns, to_work), push(patterns, to_home)]
}

/// The eight-rule public-transport chain: walk to a station, board the line,
/// alight at another of its stations, walk to work — and the mirror image
/// home.  Adjacent rules share their endpoint lists by reference.
fn transit_commute(
    world:      &World,
    patterns:   &mut Vec<CommutingPattern>,
    rng:        &mut SimRng,
    home:       SiteId,
    businesses: &[SiteId],
    stations:   &[SiteId],
) -> Vec<PatternId> {
    let home_sites: Arc<[SiteId]> = Arc::from(vec![home]);
    let boarding: Arc<[SiteId]> = choose_one(rng, stations);

    // The line must actually serve the boarding station.
    let served_by = match &world.site(boarding[0]).kind {
        SiteKind::Station { lines, .. } if !lines.is_empty() => lines.clone(),
        _ => return car_commute(patterns, rng, home, businesses),
    };
    let line: Arc<[SiteId]> = choose_one(rng, &served_by);

    // Alight anywhere on the line other than where we got on.
    let line_path = world
        .site(line[0])
        .transit_line()
        .map(|l| l.path.clone())
        .unwrap_or_default();
    let exits: Vec<SiteId> = line_path
        .iter()
        .copied()
        .filter(|&s| s != boarding[0])
        .collect();
    if exits.is_empty() {
        return car_commute(patterns, rng, home, businesses);
    }
    let alighting = choose_one(rng, &exits);

    let workplace = choose_one(rng, businesses);
    // Walking legs derive their duration from the actual site distance.
    let walk = TravelTime::from_speed(WALK_SPEED_M_PER_MIN);

    // The certain-probability legs share endpoints in both directions, so
    // each leg is gated to its half of the day — otherwise an arriving
    // returner would immediately match the outbound rule for the same
    // station and bounce back.
    let outbound = |builder: epi_commute::CommutingPatternBuilder| builder.window(480.0, 780.0);
    let evening = |builder: epi_commute::CommutingPatternBuilder| builder.window(840.0, 1_439.0);

    let well_formed = "transit commute rule is statically well-formed";
    let ids = [
        // Outbound: walk, board, ride, alight, walk.
        CommutingPattern::builder(boarding.clone())
            .origins(home_sites.clone())
            .weekdays(WeekdaySet::of(&Weekday::ALL[..6]))
            .window(480.0, 540.0)
            .travel_time(walk.clone())
            .probability_per_minute(0.01)
            .build()
            .expect(well_formed),
        outbound(CommutingPattern::builder(line.clone()).origins(boarding.clone()))
            .travel_minutes(0.0)
            .probability_per_minute(1.0)
            .build()
            .expect(well_formed),
        outbound(CommutingPattern::builder(alighting.clone()).origins(line.clone()))
            .travel_minutes(0.0)
            .probability_per_minute(1.0)
            .build()
            .expect(well_formed),
        outbound(CommutingPattern::builder(workplace.clone()).origins(alighting.clone()))
            .travel_time(walk.clone())
            .probability_per_minute(1.0)
            .build()
            .expect(well_formed),
        // Return: the same chain mirrored.
        CommutingPattern::builder(alighting.clone())
            .origins(workplace)
            .min_dwell(540.0)
            .travel_time(walk.clone())
            .probability_per_minute(0.04)
            .build()
            .expect(well_formed),
        evening(CommutingPattern::builder(line.clone()).origins(alighting))
            .travel_minutes(0.0)
            .probability_per_minute(1.0)
            .build()
            .expect(well_formed),
        evening(CommutingPattern::builder(boarding.clone()).origins(line))
            .travel_minutes(0.0)
            .probability_per_minute(1.0)
            .build()
            .expect(well_formed),
        evening(CommutingPattern::builder(home_sites).origins(boarding))
            .travel_time(walk)
            .probability_per_minute(1.0)
            .build()
            .expect(well_formed),
    ];

    ids.into_iter().map(|p| push(patterns, p)).collect()
}
