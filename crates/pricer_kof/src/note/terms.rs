//! Contract terms of the knock-out forward note.

use crate::mc::PricingError;

/// Trading days per year used to discount observation days.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Observations per year of tenor.
pub const OBSERVATIONS_PER_YEAR: f64 = 12.0;

/// Immutable economic terms of one note.
///
/// Observation `m` (1-based) falls on path index
/// `observation_interval * m + delay_days`.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::note::ContractTerms;
///
/// let terms = ContractTerms::builder()
///     .strike(1.335)
///     .notional(1_000_000.0)
///     .leverage(2.0)
///     .observation_interval(20)
///     .max_observations_for_tenor(2.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(terms.max_observations(), 24);
/// assert_eq!(terms.observation_day(3), 60);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContractTerms {
    strike: f64,
    notional: f64,
    upfront_premium: f64,
    leverage: f64,
    discount_rate: f64,
    observation_interval: usize,
    max_observations: usize,
    delay_days: usize,
    target_count: usize,
    target: f64,
}

impl Default for ContractTerms {
    /// One-year EUR/USD reference note with monthly observation.
    fn default() -> Self {
        Self {
            strike: 1.335,
            notional: 1_000_000.0,
            upfront_premium: 50_000.0,
            leverage: 2.0,
            discount_rate: 0.009,
            observation_interval: 20,
            max_observations: 12,
            delay_days: 0,
            target_count: 4,
            target: 0.1,
        }
    }
}

impl ContractTerms {
    /// Creates a builder pre-filled with the reference defaults.
    #[inline]
    pub fn builder() -> ContractTermsBuilder {
        ContractTermsBuilder::default()
    }

    /// Returns the strike rate.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the notional in base currency.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the upfront premium in quote currency.
    #[inline]
    pub fn upfront_premium(&self) -> f64 {
        self.upfront_premium
    }

    /// Returns the leverage applied on loss-accruing observations.
    #[inline]
    pub fn leverage(&self) -> f64 {
        self.leverage
    }

    /// Returns the annualised discount rate.
    #[inline]
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    /// Returns the number of trading days between observations.
    #[inline]
    pub fn observation_interval(&self) -> usize {
        self.observation_interval
    }

    /// Returns the requested maximum number of observations.
    #[inline]
    pub fn max_observations(&self) -> usize {
        self.max_observations
    }

    /// Returns the offset added to every observation day.
    #[inline]
    pub fn delay_days(&self) -> usize {
        self.delay_days
    }

    /// Returns the early-exit quota across paths.
    #[inline]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Returns the per-observation intrinsic value that triggers exit.
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Path index of observation `month` (1-based).
    ///
    /// Saturates at `usize::MAX`, which lies past the end of any path.
    #[inline]
    pub fn observation_day(&self, month: usize) -> usize {
        self.observation_interval
            .saturating_mul(month)
            .saturating_add(self.delay_days)
    }

    /// Number of observations actually scanned on paths of `path_len` prices.
    ///
    /// `min(max_observations, path_len / observation_interval - 1)`, floored
    /// at zero.
    #[inline]
    pub fn observation_count(&self, path_len: usize) -> usize {
        let supported = (path_len / self.observation_interval).saturating_sub(1);
        self.max_observations.min(supported)
    }

    /// Discount factor for a cash flow on trading day `day`.
    #[inline]
    pub fn discount_factor(&self, day: usize) -> f64 {
        (-self.discount_rate * day as f64 / TRADING_DAYS_PER_YEAR).exp()
    }

    /// Upfront premium discounted by one trading day.
    #[inline]
    pub fn discounted_premium(&self) -> f64 {
        self.upfront_premium * (-self.discount_rate / TRADING_DAYS_PER_YEAR).exp()
    }

    /// Validates the terms.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if:
    /// - `strike` is not strictly positive and finite
    /// - any amount, rate or the target is not finite
    /// - `observation_interval` or `target_count` is zero
    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.strike > 0.0 && self.strike.is_finite()) {
            return Err(PricingError::invalid(
                "strike",
                format!("{} must be positive and finite", self.strike),
            ));
        }
        for (name, value) in [
            ("notional", self.notional),
            ("upfront_premium", self.upfront_premium),
            ("leverage", self.leverage),
            ("discount_rate", self.discount_rate),
            ("target", self.target),
        ] {
            if !value.is_finite() {
                return Err(PricingError::invalid(name, format!("{} must be finite", value)));
            }
        }
        if self.observation_interval == 0 {
            return Err(PricingError::invalid(
                "observation_interval",
                "must be at least one trading day",
            ));
        }
        if self.target_count == 0 {
            return Err(PricingError::invalid("target_count", "must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for [`ContractTerms`].
#[derive(Clone, Debug, Default)]
pub struct ContractTermsBuilder {
    terms: ContractTerms,
}

impl ContractTermsBuilder {
    /// Sets the strike rate.
    #[inline]
    pub fn strike(mut self, strike: f64) -> Self {
        self.terms.strike = strike;
        self
    }

    /// Sets the notional.
    #[inline]
    pub fn notional(mut self, notional: f64) -> Self {
        self.terms.notional = notional;
        self
    }

    /// Sets the upfront premium.
    #[inline]
    pub fn upfront_premium(mut self, premium: f64) -> Self {
        self.terms.upfront_premium = premium;
        self
    }

    /// Sets the leverage.
    #[inline]
    pub fn leverage(mut self, leverage: f64) -> Self {
        self.terms.leverage = leverage;
        self
    }

    /// Sets the annualised discount rate.
    #[inline]
    pub fn discount_rate(mut self, rate: f64) -> Self {
        self.terms.discount_rate = rate;
        self
    }

    /// Sets the trading days between observations.
    #[inline]
    pub fn observation_interval(mut self, days: usize) -> Self {
        self.terms.observation_interval = days;
        self
    }

    /// Sets the maximum number of observations.
    #[inline]
    pub fn max_observations(mut self, count: usize) -> Self {
        self.terms.max_observations = count;
        self
    }

    /// Derives the maximum number of observations as twelve per year.
    #[inline]
    pub fn max_observations_for_tenor(mut self, years: f64) -> Self {
        self.terms.max_observations = (OBSERVATIONS_PER_YEAR * years).round().max(0.0) as usize;
        self
    }

    /// Sets the offset added to each observation day.
    #[inline]
    pub fn delay_days(mut self, days: usize) -> Self {
        self.terms.delay_days = days;
        self
    }

    /// Sets the early-exit quota across paths.
    #[inline]
    pub fn target_count(mut self, count: usize) -> Self {
        self.terms.target_count = count;
        self
    }

    /// Sets the per-observation exit target.
    #[inline]
    pub fn target(mut self, target: f64) -> Self {
        self.terms.target = target;
        self
    }

    /// Builds the terms.
    ///
    /// # Errors
    ///
    /// See [`ContractTerms::validate`].
    pub fn build(self) -> Result<ContractTerms, PricingError> {
        self.terms.validate()?;
        Ok(self.terms)
    }
}
