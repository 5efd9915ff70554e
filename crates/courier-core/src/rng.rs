//! Deterministic RNG wrapper for randomized planning heuristics.
//!
//! # Determinism strategy
//!
//! Every randomized component owns its own `PlanRng` seeded from the
//! planner's configured seed.  The same seed and the same inputs always
//! produce the same stop order, so plans are reproducible run-to-run.
//!
//! Child generators are derived by mixing the parent's next output with an
//! offset times the 64-bit fractional golden ratio, which spreads
//! consecutive offsets uniformly across the seed space.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded `SmallRng` used by the local-search stop orderer.
///
/// Not `Sync`: each search owns its generator.
pub struct PlanRng(SmallRng);

impl PlanRng {
    pub fn new(seed: u64) -> Self {
        PlanRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent child generator, e.g. one per planning request
    /// served from a long-lived planner.
    pub fn child(&mut self, offset: u64) -> PlanRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        PlanRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
