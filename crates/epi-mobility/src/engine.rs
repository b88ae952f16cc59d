//! The movement phase: one pass over all people.

use epi_commute::CommutingPattern;
use epi_core::{PersonId, SimRng, SimTime};
use epi_policy::Policy;
use epi_world::World;

/// Run the movement phase for every person, in creation order.
///
/// The iteration order is part of the determinism contract: together with
/// the single RNG stream it makes runs reproducible.  Each person's
/// transition touches only its own membership entries, so the order does not
/// affect which transitions happen — only which random draws they consume.
///
/// `patterns` is the registry people's `PatternId`s index into.
pub fn advance_people(
    world:        &mut World,
    patterns:     &[CommutingPattern],
    policy:       &dyn Policy,
    time:         SimTime,
    step_minutes: f64,
    rng:          &mut SimRng,
) {
    for idx in 0..world.person_count() {
        step_person(world, patterns, policy, PersonId(idx as u32), time, step_minutes, rng);
    }
}

/// Advance one person by one tick.
fn step_person(
    world:        &mut World,
    patterns:     &[CommutingPattern],
    policy:       &dyn Policy,
    person:       PersonId,
    time:         SimTime,
    step_minutes: f64,
    rng:          &mut SimRng,
) {
    // ── In transit: arrive or keep waiting ────────────────────────────────
    if let Some(trip) = world.person(person).trip {
        if time >= trip.arrival {
            // Surface at the destination; transfer resets dwell and clears
            // the trip.
            world.transfer(person, trip.destination);
        } else {
            // Waiting in the sentinel still counts as dwell time there.
            world.person_mut(person).dwell_minutes += step_minutes;
        }
        return;
    }

    // ── Resident: first rule that fires wins ──────────────────────────────
    let current = world.person(person).site;
    let dwell = world.person(person).dwell_minutes;

    let mut fired = None;
    for k in 0..world.person(person).patterns.len() {
        let pattern_id = world.person(person).patterns[k];
        let pattern = &patterns[pattern_id.index()];
        if let Some(commute) = pattern.apply(world, current, time, dwell, step_minutes, rng) {
            fired = Some(commute);
            break;
        }
    }

    let Some(commute) = fired else {
        // Nobody asked this person to move.
        world.person_mut(person).dwell_minutes += step_minutes;
        return;
    };

    if commute.destination == current {
        // Degenerate self-loop rule: treat as a no-op.
        world.person_mut(person).dwell_minutes += step_minutes;
        return;
    }

    // The policy is consulted once, before any membership commit.
    if !policy.authorize_move(person, current, commute.destination, time) {
        world.person_mut(person).dwell_minutes += step_minutes;
        return;
    }

    if commute.arrival > time {
        // Travel takes time: disappear into the sentinel until arrival.
        world.begin_trip(person, commute.destination, commute.arrival);
    } else {
        // Instantaneous (or already elapsed) travel: move directly.
        world.transfer(person, commute.destination);
    }
}
