//! The transit vehicle scheduler.
//!
//! Runs before the people phase each tick, so boarding rules see vehicles
//! where they actually are.  A vehicle is docked (`current_station = Some`)
//! for exactly the tick on which it reaches a station and is nowhere
//! (`current_station = None`) while covering a leg; people aboard remain
//! occupants of the vehicle site throughout and get on or off only through
//! their own commuting rules.
//!
//! One station event happens per vehicle per tick: legs shorter than the tick
//! step are not subdivided, so timetables should use legs of at least one
//! step for every stop to be boardable.

use epi_core::{SimTime, SiteId, MINUTES_PER_DAY, MINUTES_PER_WEEK};
use epi_world::{TransitLine, World};

/// Advance every transit vehicle by one tick.
pub fn advance_transit(world: &mut World, time: SimTime, step_minutes: f64) {
    for idx in 0..world.site_count() {
        let id = SiteId(idx as u32);
        let Some(line) = world.site_mut(id).transit_line_mut() else {
            continue;
        };
        step_vehicle(line, time, step_minutes);
    }
}

/// Advance one vehicle by one tick.
fn step_vehicle(line: &mut TransitLine, time: SimTime, step_minutes: f64) {
    match line.next_stop_time {
        Some(next_stop_time) => {
            if time >= next_stop_time {
                // Reached the approached station: dock there for this tick.
                line.current_station = Some(line.path[line.next_stop]);
                if line.next_stop + 1 < line.path.len() {
                    // Depart on schedule toward the next station.
                    let leg = line.leg_minutes[line.next_stop];
                    line.next_stop += 1;
                    line.next_stop_time = Some(next_stop_time + leg);
                } else {
                    // End of the round: idle at the terminus.
                    line.next_stop_time = None;
                }
            } else {
                // Mid-leg: the vehicle is between stations.
                line.current_station = None;
            }
        }
        None => {
            // Idle: start a round if a timetable entry falls in this tick.
            if let Some(start) = due_start(line, time, step_minutes) {
                line.current_station = Some(line.path[0]);
                line.next_stop = 1;
                line.next_stop_time = Some(start + line.leg_minutes[0]);
            }
        }
    }
}

/// The earliest timetable entry falling within `[time, time + step)`, as an
/// absolute timestamp.
fn due_start(line: &TransitLine, time: SimTime, step_minutes: f64) -> Option<SimTime> {
    let week_start = (time.minutes() / MINUTES_PER_WEEK).floor() * MINUTES_PER_WEEK;
    let mut earliest: Option<f64> = None;

    for &(weekday, minute) in &line.start_times {
        let offset = weekday.index() as f64 * MINUTES_PER_DAY + minute;
        // A tick window can straddle the week boundary, so check this week's
        // occurrence and the next week's.
        for base in [week_start, week_start + MINUTES_PER_WEEK] {
            let absolute = base + offset;
            if absolute >= time.minutes() && absolute < time.minutes() + step_minutes {
                earliest = Some(earliest.map_or(absolute, |e| e.min(absolute)));
            }
        }
    }

    earliest.map(SimTime::from_minutes)
}
