pub mod returns;
pub mod path;
pub mod monte_carlo;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Capability to draw normally distributed samples.
/// Passed explicitly into everything that needs randomness; there is no ambient RNG.
/// A source is single-owner: parallel workers each get their own.
pub trait RandomSource {
    /// One draw from Normal(mean, stdev). `stdev == 0` yields `mean`.
    fn normal(&mut self, mean: f64, stdev: f64) -> f64;
}

/// `mean + stdev * z` with `z ~ N(0, 1)` drawn from any `rand` generator.
#[derive(Debug, Clone)]
pub struct NormalSource<R: Rng> {
    rng: R,
}

impl<R: Rng> NormalSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl NormalSource<StdRng> {
    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for NormalSource<R> {
    #[inline]
    fn normal(&mut self, mean: f64, stdev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + stdev * z
    }
}

/// Seed for the stream of trial `trial` under base seed `base`.
/// SplitMix64 finalizer over `base + (trial + 1) * phi`.
#[inline]
pub fn trial_seed(base: u64, trial: u64) -> u64 {
    let mut z = base.wrapping_add(trial.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
