//! Fluent builder for constructing a [`Sim`].

use epi_commute::CommutingPattern;
use epi_core::{SimConfig, SimRng};
use epi_policy::Policy;
use epi_world::World;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, step, …
/// - [`World`] — from world generation (or the CSV loaders)
/// - `P: Policy` — the intervention policy ([`OpenPolicy`]
///   [epi_policy::OpenPolicy] when none applies)
///
/// # Optional inputs
///
/// | Method          | Default                  |
/// |-----------------|--------------------------|
/// | `.patterns(v)`  | Empty registry (nobody moves) |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, world, OpenPolicy)
///     .patterns(patterns)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<P: Policy> {
    config:   SimConfig,
    world:    World,
    patterns: Vec<CommutingPattern>,
    policy:   P,
}

impl<P: Policy> SimBuilder<P> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, world: World, policy: P) -> Self {
        Self {
            config,
            world,
            patterns: Vec::new(),
            policy,
        }
    }

    /// Supply the commuting rule registry people's `PatternId`s index into.
    pub fn patterns(mut self, patterns: Vec<CommutingPattern>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Validate the cross-references and produce a ready-to-run [`Sim`].
    ///
    /// Fails fast on a non-positive step, a person referencing a pattern
    /// outside the registry, or a world whose occupancy index has been
    /// corrupted — all of which would otherwise surface as nonsense mid-run.
    pub fn build(self) -> SimResult<Sim<P>> {
        if !(self.config.step_minutes.is_finite() && self.config.step_minutes > 0.0) {
            return Err(SimError::Config(format!(
                "step_minutes must be positive, got {}",
                self.config.step_minutes
            )));
        }

        for person_id in self.world.person_ids() {
            for &pattern in &self.world.person(person_id).patterns {
                if pattern.index() >= self.patterns.len() {
                    return Err(SimError::PatternOutOfRange {
                        person:       person_id,
                        pattern,
                        registry_len: self.patterns.len(),
                    });
                }
            }
        }

        if !self.world.occupancy_consistent() {
            return Err(SimError::InconsistentOccupancy);
        }

        Ok(Sim {
            clock:    self.config.make_clock(),
            rng:      SimRng::new(self.config.seed),
            config:   self.config,
            world:    self.world,
            patterns: self.patterns,
            policy:   self.policy,
        })
    }
}
