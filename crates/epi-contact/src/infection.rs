//! The infection phase: scores, outcomes, and the per-tick driver.

use rustc_hash::FxHashSet;

use epi_core::{PersonId, SimRng, SimTime, SiteId};
use epi_policy::Policy;
use epi_world::{Site, World};

use crate::sampling::sample_meetings;
use crate::Meeting;

/// Per-minute probability that an infected meeting participant heals.
pub const HEALING_RATE_PER_MINUTE: f64 = 0.000_01;

const SCORE_DIVISOR: f64 = 50.0;

/// The probability that an infected participant heals this tick.
#[inline]
pub fn healing_probability(step_minutes: f64) -> f64 {
    HEALING_RATE_PER_MINUTE * step_minutes
}

/// The per-site infecting score for this tick.
///
/// `ill` of the site's occupants are infected.  Callers must only invoke this
/// for occupied sites — the score is undefined at zero occupancy (the phase
/// never needs it there, since an empty site has no meetings).
pub fn infecting_score(site: &Site, ill: usize, step_minutes: f64) -> f64 {
    let n = site.occupant_count() as f64;
    debug_assert!(n > 0.0, "infecting score needs at least one occupant");
    step_minutes
        * (ill as f64 / n)
        * (n / site.area_m2)
        * (n / site.nominal_capacity as f64)
        * site.dispersion_factor
        / SCORE_DIVISOR
}

/// Run the infection phase over every non-sentinel site, in creation order.
///
/// Per site: refresh the meeting probability from post-movement occupancy,
/// sample this tick's meetings, discard those with no infected participant,
/// then apply one outcome per distinct participant of the remaining
/// meetings.  People appearing in no qualifying meeting are untouched.
pub fn run_infection_phase(
    world:        &mut World,
    policy:       &dyn Policy,
    time:         SimTime,
    step_minutes: f64,
    rng:          &mut SimRng,
) {
    let mut meetings: Vec<Meeting> = Vec::new();
    let mut touched: FxHashSet<PersonId> = FxHashSet::default();

    for idx in 1..world.site_count() as u32 {
        let site_id = SiteId(idx);

        world.site_mut(site_id).update_meeting_probability();

        meetings.clear();
        sample_meetings(world, site_id, time, rng, &mut meetings);
        meetings.retain(|meeting| meeting.involves_infection(world));
        if meetings.is_empty() {
            continue;
        }

        // Snapshot the score before any outcome mutates health state.
        let ill = world
            .site(site_id)
            .occupants()
            .iter()
            .filter(|&&person| world.person(person).is_infected())
            .count();
        let score = infecting_score(world.site(site_id), ill, step_minutes);

        // One outcome per distinct participant, in first-appearance order.
        touched.clear();
        for meeting in &meetings {
            for &person in &meeting.participants {
                if touched.insert(person) {
                    apply_outcome(world, policy, person, site_id, score, step_minutes, rng);
                }
            }
        }
    }
}

/// Heal-or-progress for the infected, an infection trial for the rest.
fn apply_outcome(
    world:        &mut World,
    policy:       &dyn Policy,
    person:       PersonId,
    site:         SiteId,
    score:        f64,
    step_minutes: f64,
    rng:          &mut SimRng,
) {
    if world.person(person).is_infected() {
        if rng.gen_bool(healing_probability(step_minutes)) {
            let p = world.person_mut(person);
            p.illness_degree = 0.0;
            p.symptoms_degree = 0.0;
            p.immunity_degree = 1.0;
            p.infected_minutes = None;
        } else {
            let p = world.person_mut(person);
            p.infected_minutes = Some(p.infected_minutes.unwrap_or(0.0) + step_minutes);
        }
    } else {
        let p = world.person(person);
        let person_score = score
            * (1.0 - p.immunity_degree)
            * p.susceptibility_degree
            * policy.transmission_scale(person, site);
        if rng.gen_bool(person_score) {
            let p = world.person_mut(person);
            p.illness_degree = 1.0;
            p.infected_minutes = Some(0.0);
        }
    }
}
