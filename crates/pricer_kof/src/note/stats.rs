//! Portfolio-level statistics over per-path payoffs.

use crate::mc::PricingError;

use super::engine::PathResult;

/// Lower-tail probability used for the tail quantile.
pub const TAIL_PROBABILITY: f64 = 0.05;

/// The five headline numbers of a pricing run.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::note::AggregateStatistics;
///
/// let payoffs: Vec<f64> = (1..=100).map(f64::from).collect();
/// let stats = AggregateStatistics::from_payoffs(&payoffs, 10).unwrap();
///
/// assert_eq!(stats.mean, 50.5);
/// assert_eq!(stats.tail_quantile, 6.0);
/// assert_eq!(stats.early_exit_probability, 0.1);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregateStatistics {
    /// Mean discounted payoff.
    pub mean: f64,
    /// Standard error of the mean (sample variance with Bessel's correction).
    pub standard_error: f64,
    /// Number of paths flagged early-exited.
    pub early_exit_count: usize,
    /// `early_exit_count / n_paths`.
    pub early_exit_probability: f64,
    /// 5th percentile of the payoff distribution (nearest rank).
    pub tail_quantile: f64,
    /// Number of paths aggregated.
    pub n_paths: usize,
}

impl AggregateStatistics {
    /// Aggregates engine results.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::DegenerateStatistics`] for fewer than two results.
    pub fn from_results(results: &[PathResult]) -> Result<Self, PricingError> {
        let payoffs: Vec<f64> = results.iter().map(|r| r.payoff).collect();
        let early_exit_count = results.iter().filter(|r| r.early_exited).count();
        Self::from_payoffs(&payoffs, early_exit_count)
    }

    /// Aggregates raw payoffs with a known early-exit count.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::DegenerateStatistics`] for fewer than two
    /// payoffs, and [`PricingError::InvalidParameter`] if
    /// `early_exit_count` exceeds the number of payoffs.
    pub fn from_payoffs(payoffs: &[f64], early_exit_count: usize) -> Result<Self, PricingError> {
        let n_paths = payoffs.len();
        if early_exit_count > n_paths {
            return Err(PricingError::invalid(
                "early_exit_count",
                format!("{} exceeds {} paths", early_exit_count, n_paths),
            ));
        }

        let standard_error = standard_error(payoffs)?;
        Ok(Self {
            mean: mean(payoffs)?,
            standard_error,
            early_exit_count,
            early_exit_probability: early_exit_count as f64 / n_paths as f64,
            tail_quantile: quantile(payoffs, TAIL_PROBABILITY)?,
            n_paths,
        })
    }

    /// Early-exit probability in percent.
    #[inline]
    pub fn early_exit_percent(&self) -> f64 {
        100.0 * self.early_exit_probability
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn confidence_95(&self) -> f64 {
        1.96 * self.standard_error
    }
}

/// Arithmetic mean.
///
/// # Errors
///
/// Returns [`PricingError::DegenerateStatistics`] for an empty slice.
pub fn mean(values: &[f64]) -> Result<f64, PricingError> {
    if values.is_empty() {
        return Err(PricingError::DegenerateStatistics { n_samples: 0 });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard error of the mean, `sqrt(s² / n)` with `s²` the sample variance.
///
/// # Errors
///
/// Returns [`PricingError::DegenerateStatistics`] for fewer than two values.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::note::stats::standard_error;
///
/// assert_eq!(standard_error(&[10.0, 10.0, 10.0, 10.0]).unwrap(), 0.0);
/// assert!(standard_error(&[10.0]).unwrap_err().is_degenerate());
/// ```
pub fn standard_error(values: &[f64]) -> Result<f64, PricingError> {
    let n = values.len();
    if n <= 1 {
        return Err(PricingError::DegenerateStatistics { n_samples: n });
    }
    let m = mean(values)?;
    let variance = values.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / (n - 1) as f64;
    Ok(variance.sqrt() / (n as f64).sqrt())
}

/// Nearest-rank quantile: ascending sort, index `floor(q * n)`, no
/// interpolation.
///
/// # Errors
///
/// Returns [`PricingError::DegenerateStatistics`] for an empty slice and
/// [`PricingError::InvalidParameter`] if `q` lies outside `[0, 1)`.
pub fn quantile(values: &[f64], q: f64) -> Result<f64, PricingError> {
    if values.is_empty() {
        return Err(PricingError::DegenerateStatistics { n_samples: 0 });
    }
    if !(0.0..1.0).contains(&q) {
        return Err(PricingError::invalid("quantile", format!("{} outside [0, 1)", q)));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let index = ((q * sorted.len() as f64) as usize).min(sorted.len() - 1);
    Ok(sorted[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tail_quantile_on_ramp() {
        let payoffs: Vec<f64> = (1..=100).map(f64::from).collect();

        assert_eq!(quantile(&payoffs, TAIL_PROBABILITY).unwrap(), 6.0);
        assert_eq!(mean(&payoffs).unwrap(), 50.5);
    }

    #[test]
    fn test_quantile_ignores_input_order() {
        let mut payoffs: Vec<f64> = (1..=100).map(f64::from).collect();
        payoffs.reverse();
        assert_eq!(quantile(&payoffs, 0.05).unwrap(), 6.0);
        assert_eq!(quantile(&payoffs, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&payoffs, 0.999).unwrap(), 100.0);
    }

    #[test]
    fn test_quantile_small_sample_uses_floor() {
        // floor(0.05 * 10) = 0
        let payoffs = [5.0, 3.0, 9.0, 1.0, 7.0, 2.0, 8.0, 4.0, 6.0, 10.0];
        assert_eq!(quantile(&payoffs, 0.05).unwrap(), 1.0);
    }

    #[test]
    fn test_quantile_rejects_bad_probability() {
        assert!(quantile(&[1.0, 2.0], 1.0).is_err());
        assert!(quantile(&[1.0, 2.0], -0.1).is_err());
        assert!(quantile(&[1.0, 2.0], f64::NAN).is_err());
    }

    #[test]
    fn test_standard_error_constant_sample() {
        assert_eq!(standard_error(&[10.0, 10.0, 10.0, 10.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_standard_error_uses_bessel_correction() {
        // mean 2.5, squared deviations 2.25+0.25+0.25+2.25 = 5, s² = 5/3
        let se = standard_error(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(se, (5.0_f64 / 3.0 / 4.0).sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_degenerate_samples() {
        assert_eq!(
            standard_error(&[1.0]),
            Err(PricingError::DegenerateStatistics { n_samples: 1 })
        );
        assert_eq!(
            standard_error(&[]),
            Err(PricingError::DegenerateStatistics { n_samples: 0 })
        );
        assert!(mean(&[]).unwrap_err().is_degenerate());
        assert!(quantile(&[], 0.05).unwrap_err().is_degenerate());
        assert!(AggregateStatistics::from_payoffs(&[3.0], 0)
            .unwrap_err()
            .is_degenerate());
    }

    #[test]
    fn test_from_results_counts_exits() {
        let results = [
            PathResult::new(1.0, true),
            PathResult::new(2.0, false),
            PathResult::new(3.0, true),
            PathResult::new(4.0, false),
        ];
        let stats = AggregateStatistics::from_results(&results).unwrap();

        assert_eq!(stats.early_exit_count, 2);
        assert_eq!(stats.early_exit_probability, 0.5);
        assert_eq!(stats.early_exit_percent(), 50.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.tail_quantile, 1.0);
        assert_eq!(stats.n_paths, 4);
        assert_relative_eq!(stats.confidence_95(), 1.96 * stats.standard_error);
    }

    #[test]
    fn test_from_payoffs_rejects_excess_exits() {
        assert!(matches!(
            AggregateStatistics::from_payoffs(&[1.0, 2.0], 3),
            Err(PricingError::InvalidParameter { .. })
        ));
    }
}
