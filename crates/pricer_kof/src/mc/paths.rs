//! GBM path generation.
//!
//! Uses the exact log-space step
//! ```text
//! S(t+dt) = S(t) × exp((r1 - r2 - 0.5σ²)dt + σ√dt × Z)
//! ```
//! so prices never cross zero.
//!
//! # Draw Order
//!
//! Normals are consumed step-major: every path's first step, then every
//! path's second step, and so on. A fixed seed therefore assigns the same
//! draw to the same (path, step) cell regardless of how the matrix is later
//! read.

use tracing::debug;

use super::config::SimulationParameters;
use super::error::PricingError;
use super::matrix::PriceMatrix;
use crate::rng::{NormalSource, PricerRng};

/// Generates the full path matrix for `params`.
///
/// Seeds a fresh [`PricerRng`] from `params.seed()` when
/// `params.seed_fixed()` is set, otherwise from OS entropy. The generator
/// lives only for this call, so repeated seeded calls are bit-identical.
///
/// # Errors
///
/// Returns `PricingError` if the parameters fail validation.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::mc::{generate, SimulationParameters};
///
/// let params = SimulationParameters::builder()
///     .n_paths(100)
///     .n_steps(12)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let a = generate(&params).unwrap();
/// let b = generate(&params).unwrap();
///
/// assert_eq!(a.n_paths(), 100);
/// assert_eq!(a.path_len(), 13);
/// assert_eq!(a, b);
/// ```
pub fn generate(params: &SimulationParameters) -> Result<PriceMatrix, PricingError> {
    let mut rng = PricerRng::new(params.seed(), params.seed_fixed());
    debug!(
        n_paths = params.n_paths(),
        n_steps = params.n_steps(),
        seed = ?rng.seed(),
        "generating GBM paths"
    );
    generate_with_source(params, &mut rng)
}

/// Generates the full path matrix drawing normals from `source`.
///
/// Exactly `n_paths × n_steps` values are drawn, in step-major order.
///
/// # Errors
///
/// Returns `PricingError` if the parameters fail validation, or
/// [`PricingError::InvalidMatrix`] if a step underflows to zero or overflows
/// (extreme `σ√dt` or drift).
///
/// # Algorithm
///
/// 1. Precompute `drift_dt = μ·dt` and `vol_sqrt_dt = σ√dt`
/// 2. Set column 0 of every path to the spot
/// 3. For each step, for each path: `S[j][i] = S[j][i-1] × exp(drift_dt + vol_sqrt_dt × Z)`
pub fn generate_with_source<S: NormalSource>(
    params: &SimulationParameters,
    mut source: S,
) -> Result<PriceMatrix, PricingError> {
    params.validate()?;

    let n_paths = params.n_paths();
    let n_steps = params.n_steps();
    let path_len = n_steps + 1;

    let dt = params.dt();
    let drift_dt = params.drift() * dt;
    let vol_sqrt_dt = params.volatility() * dt.sqrt();

    let mut prices = vec![params.spot(); n_paths * path_len];

    for step in 1..=n_steps {
        for path_idx in 0..n_paths {
            let z = source.next_normal();
            let idx = path_idx * path_len + step;
            let price = prices[idx - 1] * (drift_dt + vol_sqrt_dt * z).exp();
            if !(price > 0.0 && price.is_finite()) {
                return Err(PricingError::InvalidMatrix(format!(
                    "path {} step {} left the positive range ({})",
                    path_idx, step, price
                )));
            }
            prices[idx] = price;
        }
    }

    Ok(PriceMatrix::from_raw(prices, n_paths, path_len))
}
