//! The `Sim` struct and its tick loop.

use epi_commute::CommutingPattern;
use epi_contact::run_infection_phase;
use epi_core::{SimClock, SimConfig, SimRng, SimTime};
use epi_mobility::{advance_people, advance_transit};
use epi_policy::Policy;
use epi_world::{SirCounts, World};

use crate::SimObserver;

/// Advance the whole world by one tick: transit, then movement, then
/// infection.
///
/// This is the complete per-tick semantics; [`Sim`] only adds the clock,
/// the observer plumbing, and configuration.  Given valid construction every
/// step of this function is total — there is no runtime error path.
pub fn advance_tick(
    world:        &mut World,
    patterns:     &[CommutingPattern],
    policy:       &dyn Policy,
    time:         SimTime,
    step_minutes: f64,
    rng:          &mut SimRng,
) {
    advance_transit(world, time, step_minutes);
    advance_people(world, patterns, policy, time, step_minutes, rng);
    run_infection_phase(world, policy, time, step_minutes, rng);
}

/// The main simulation runner.
///
/// Holds all state of a run; create via [`SimBuilder`][crate::SimBuilder].
/// Fields are public so callers can inspect (or, between runs, adjust) the
/// world — the tick loop itself only ever goes through [`advance_tick`].
pub struct Sim<P: Policy> {
    /// Global configuration (total ticks, seed, step, …).
    pub config: SimConfig,

    /// Simulation clock — current timestamp and tick counter.
    pub clock: SimClock,

    /// All sites, people, and households.
    pub world: World,

    /// The rule registry that people's `PatternId`s index into.
    pub patterns: Vec<CommutingPattern>,

    /// The intervention policy consulted by movement and infection.
    pub policy: P,

    /// The single random stream of the run.
    pub rng: SimRng,
}

impl<P: Policy> Sim<P> {
    /// Run from the current tick to `config.total_ticks`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.clock.tick < self.config.total_ticks {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.now);
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Current aggregate health counts.
    pub fn sir_counts(&self) -> SirCounts {
        self.world.sir_counts()
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.now;
        observer.on_tick_start(now);

        advance_tick(
            &mut self.world,
            &self.patterns,
            &self.policy,
            now,
            self.clock.step_minutes,
            &mut self.rng,
        );

        let counts = self.world.sir_counts();
        observer.on_tick_end(self.clock.tick, now, &counts);
        if self.config.output_interval_ticks > 0
            && self.clock.tick.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(self.clock.tick, now, &self.world);
        }

        self.clock.advance();
    }
}
