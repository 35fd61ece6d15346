//! Seedable generator behind path simulation.
//!
//! [`PricerRng`] is either reproducible from a `u64` seed or drawn from OS
//! entropy, matching the `seedFixed` switch of the simulation inputs.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use super::source::NormalSource;

/// `StdRng` with Ziggurat normals from `rand_distr::StandardNormal`.
///
/// ```rust
/// use pricer_kof::rng::PricerRng;
///
/// let mut shocks = [0.0; 240];
/// PricerRng::from_seed(123457).fill_normal(&mut shocks);
/// assert!(shocks.iter().all(|z| z.is_finite()));
/// ```
pub struct PricerRng {
    inner: StdRng,
    /// `None` when entropy-seeded.
    seed: Option<u64>,
}

impl PricerRng {
    /// Reproducible generator: equal seeds yield equal draw sequences.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Generator seeded from OS entropy; runs are not reproducible.
    #[inline]
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Creates a seeded or entropy-seeded generator.
    ///
    /// `seed_fixed = false` ignores `seed` entirely.
    #[inline]
    pub fn new(seed: u64, seed_fixed: bool) -> Self {
        if seed_fixed {
            Self::from_seed(seed)
        } else {
            Self::from_entropy()
        }
    }

    /// Seed this generator was built from, `None` for entropy.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Standard normal draw.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Overwrites `buffer` with standard normal draws, in order.
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        buffer.fill_with(|| StandardNormal.sample(&mut self.inner));
    }
}

impl NormalSource for PricerRng {
    #[inline]
    fn next_normal(&mut self) -> f64 {
        self.gen_normal()
    }
}

impl std::fmt::Debug for PricerRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricerRng")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
