//! Per-site meeting sampling.

use epi_core::{SimRng, SimTime, SiteId};
use epi_world::World;

use crate::Meeting;

/// Sample this tick's meetings at `site` into `out`.
///
/// Every occupant independently draws against the site's meeting probability
/// (a percentage: uniform in `[0, 100)` compared against it); on success the
/// occupant is paired with one *other* occupant chosen uniformly.  The same
/// pair can be sampled more than once and a person can appear in several
/// meetings — each sampled meeting is processed independently downstream.
///
/// The caller is expected to have refreshed the site's meeting probability
/// this tick; a probability of zero (fewer than two occupants, or an empty
/// site) samples nothing.
pub fn sample_meetings(
    world:   &World,
    site_id: SiteId,
    time:    SimTime,
    rng:     &mut SimRng,
    out:     &mut Vec<Meeting>,
) {
    let site = world.site(site_id);
    let probability = site.meeting_probability;
    let occupants = site.occupants();
    if probability <= 0.0 || occupants.len() < 2 {
        return;
    }

    for (i, &person) in occupants.iter().enumerate() {
        if rng.percent() < probability {
            // Uniform choice over the other occupants: draw an index into
            // the n-1 remaining slots and skip past our own.
            let mut other = rng.gen_range(0..occupants.len() - 1);
            if other >= i {
                other += 1;
            }
            out.push(Meeting {
                time,
                participants: [person, occupants[other]],
                site: site_id,
            });
        }
    }
}
