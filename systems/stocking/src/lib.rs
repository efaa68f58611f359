#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic stocking system responsible for the opening population.
//!
//! The system only chooses species and ages. Variants, pigment and placement
//! are left to the arena so spawn weights and containment are decided in one
//! place.

use fishtank_core::{Command, FishRequest, SpeciesCatalog};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the stocking system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    population: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for `population` fish drawn with `rng_seed`.
    #[must_use]
    pub const fn new(population: usize, rng_seed: u64) -> Self {
        Self {
            population,
            rng_seed,
        }
    }

    /// Number of fish requested by [`Stocking::stock`].
    #[must_use]
    pub const fn population(&self) -> usize {
        self.population
    }
}

/// Pure system that emits the `AddFish` commands filling a fresh tank.
#[derive(Debug)]
pub struct Stocking {
    population: usize,
    rng_state: u64,
}

impl Stocking {
    /// Creates a new stocking system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            population: config.population,
            rng_state: config.rng_seed,
        }
    }

    /// Emits one request per fish, each with a random species and a random
    /// age among that species' stages.
    ///
    /// Species without stages are never picked. Nothing is emitted when the
    /// catalog offers no usable species.
    pub fn stock(&mut self, catalog: &SpeciesCatalog, out: &mut Vec<Command>) {
        let candidates: Vec<(&str, usize)> = catalog
            .names()
            .filter_map(|name| {
                let stages = catalog.get(name)?.stages.len();
                (stages > 0).then_some((name, stages))
            })
            .collect();
        if candidates.is_empty() {
            return;
        }

        for _ in 0..self.population {
            let (species, stages) = candidates[self.pick(candidates.len())];
            let age = self.pick(stages);
            out.push(Command::AddFish {
                request: FishRequest::new(species).with_age(age),
            });
        }
    }

    fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick requires a non-empty range");
        let value = self.advance_rng() >> 33;
        (value % len as u64) as usize
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}
