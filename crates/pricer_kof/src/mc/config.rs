//! Monte Carlo simulation parameters.
//!
//! [`SimulationParameters`] carries the GBM model inputs for one FX rate plus
//! the simulation dimensions and seeding mode. Instances are immutable and are
//! only obtainable through [`SimulationParametersBuilder::build`], which
//! validates every field.

use super::error::PricingError;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 100_000;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 123_457;

/// Model and simulation inputs for path generation.
///
/// The rate follows
/// ```text
/// dS = (r1 - r2) S dt + σ S dW
/// ```
/// with `r1` the quote-currency rate and `r2` the base-currency rate.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::mc::SimulationParameters;
///
/// let params = SimulationParameters::builder()
///     .spot(1.1824)
///     .volatility(0.0713)
///     .n_paths(10_000)
///     .n_steps(240)
///     .seed(42)
///     .build()
///     .expect("valid parameters");
///
/// assert_eq!(params.n_paths(), 10_000);
/// assert_eq!(params.seed(), 42);
/// assert!(params.seed_fixed());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationParameters {
    /// Initial spot rate (S₀).
    spot: f64,
    /// Annualised volatility (σ).
    volatility: f64,
    /// Quote-currency rate (r1), annualised.
    quote_rate: f64,
    /// Base-currency rate (r2), annualised.
    base_rate: f64,
    /// Horizon in years (T).
    maturity: f64,
    /// Number of simulation paths.
    n_paths: usize,
    /// Number of time steps per path.
    n_steps: usize,
    /// Seed used when `seed_fixed` is set.
    seed: u64,
    /// Deterministic seeding; `false` draws the seed from OS entropy.
    seed_fixed: bool,
}

impl Default for SimulationParameters {
    /// EUR/USD-style reference set: one year, 20 trading days per month.
    fn default() -> Self {
        Self {
            spot: 1.375,
            volatility: 0.0713,
            quote_rate: 0.009,
            base_rate: 0.012,
            maturity: 1.0,
            n_paths: 1000,
            n_steps: 240,
            seed: DEFAULT_SEED,
            seed_fixed: true,
        }
    }
}

impl SimulationParameters {
    /// Creates a builder pre-filled with the reference defaults.
    #[inline]
    pub fn builder() -> SimulationParametersBuilder {
        SimulationParametersBuilder::default()
    }

    /// Returns the initial spot rate.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the quote-currency rate (r1).
    #[inline]
    pub fn quote_rate(&self) -> f64 {
        self.quote_rate
    }

    /// Returns the base-currency rate (r2).
    #[inline]
    pub fn base_rate(&self) -> f64 {
        self.base_rate
    }

    /// Returns the horizon in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the configured seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns whether the seed is used (otherwise entropy seeding).
    #[inline]
    pub fn seed_fixed(&self) -> bool {
        self.seed_fixed
    }

    /// Risk-neutral log drift `μ = r1 - r2 - σ²/2`.
    #[inline]
    pub fn drift(&self) -> f64 {
        self.quote_rate - self.base_rate - 0.5 * self.volatility * self.volatility
    }

    /// Time step `dt = T / n`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.maturity / self.n_steps as f64
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if:
    /// - `n_paths` is 0 or greater than [`MAX_PATHS`]
    /// - `n_steps` is 0 or greater than [`MAX_STEPS`]
    /// - `spot` or `maturity` is not strictly positive and finite
    /// - `volatility` is negative or not finite
    /// - either rate is not finite
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(PricingError::InvalidPathCount(self.n_paths));
        }
        if self.n_steps == 0 || self.n_steps > MAX_STEPS {
            return Err(PricingError::InvalidStepCount(self.n_steps));
        }
        if !(self.spot > 0.0 && self.spot.is_finite()) {
            return Err(PricingError::invalid(
                "spot",
                format!("{} must be positive and finite", self.spot),
            ));
        }
        if !(self.volatility >= 0.0 && self.volatility.is_finite()) {
            return Err(PricingError::invalid(
                "volatility",
                format!("{} must be non-negative and finite", self.volatility),
            ));
        }
        if !self.quote_rate.is_finite() {
            return Err(PricingError::invalid("quote_rate", "must be finite"));
        }
        if !self.base_rate.is_finite() {
            return Err(PricingError::invalid("base_rate", "must be finite"));
        }
        if !(self.maturity > 0.0 && self.maturity.is_finite()) {
            return Err(PricingError::invalid(
                "maturity",
                format!("{} must be positive and finite", self.maturity),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SimulationParameters`].
///
/// Starts from [`SimulationParameters::default`]; validation happens in
/// [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct SimulationParametersBuilder {
    params: SimulationParameters,
}

impl SimulationParametersBuilder {
    /// Sets the initial spot rate.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.params.spot = spot;
        self
    }

    /// Sets the annualised volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.params.volatility = volatility;
        self
    }

    /// Sets the quote-currency rate (r1).
    #[inline]
    pub fn quote_rate(mut self, rate: f64) -> Self {
        self.params.quote_rate = rate;
        self
    }

    /// Sets the base-currency rate (r2).
    #[inline]
    pub fn base_rate(mut self, rate: f64) -> Self {
        self.params.base_rate = rate;
        self
    }

    /// Sets the horizon in years.
    #[inline]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.params.maturity = maturity;
        self
    }

    /// Sets the number of simulation paths.
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.params.n_paths = n_paths;
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.params.n_steps = n_steps;
        self
    }

    /// Fixes the seed for reproducible simulations.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self.params.seed_fixed = true;
        self
    }

    /// Chooses between the configured seed (`true`) and entropy (`false`).
    #[inline]
    pub fn seed_fixed(mut self, seed_fixed: bool) -> Self {
        self.params.seed_fixed = seed_fixed;
        self
    }

    /// Builds the parameters.
    ///
    /// # Errors
    ///
    /// See [`SimulationParameters::validate`].
    pub fn build(self) -> Result<SimulationParameters, PricingError> {
        self.params.validate()?;
        Ok(self.params)
    }
}
