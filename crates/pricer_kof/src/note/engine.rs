//! Per-path payoff scan.
//!
//! Each path is walked at its observation days:
//!
//! 1. `spot >= strike`: knock-out. The forward settles
//!    `notional × (spot − strike)` discounted to the observation day and the
//!    path exits.
//! 2. Otherwise the leveraged loss `notional × leverage × (spot − strike)` is
//!    accrued, then the path exits if the intrinsic value `strike − spot` is at
//!    most `target`, or if the exit quota has been reached.
//!
//! Every path finally receives the upfront premium discounted by one day.
//!
//! # Exit Quota
//!
//! Under [`ExitQuota::Sequential`] the quota compares `target_count` against
//! the number of paths, in index order, that exited *before* the current one.
//! The result therefore depends on path order, so paths are scanned strictly
//! sequentially with the running count threaded through as an accumulator.

use rayon::prelude::*;
use tracing::debug;

use crate::mc::{PriceMatrix, PricingError};

use super::stats::AggregateStatistics;
use super::terms::ContractTerms;

/// Outcome of one path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathResult {
    /// Discounted cash flow including the upfront premium.
    pub payoff: f64,
    /// Whether the scan ended before the last scheduled observation.
    pub early_exited: bool,
}

impl PathResult {
    /// Creates a path result.
    #[inline]
    pub fn new(payoff: f64, early_exited: bool) -> Self {
        Self {
            payoff,
            early_exited,
        }
    }
}

/// Policy for the cross-path early-exit quota.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExitQuota {
    /// Paths scanned in index order; once `target_count` earlier paths have
    /// exited, every later path exits after its first loss-accruing
    /// observation.
    #[default]
    Sequential,

    /// The quota never triggers. Paths are independent and scanned in
    /// parallel.
    Disabled,
}

/// Payoff engine over a borrowed price matrix.
///
/// Payoffs are computed on construction; the engine is read-only afterwards.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::mc::PriceMatrix;
/// use pricer_kof::note::{ContractTerms, PayoffEngine};
///
/// // Two flat paths at the strike: both knock out on the first observation.
/// let matrix = PriceMatrix::from_rows(vec![vec![1.0; 13], vec![1.0; 13]]).unwrap();
/// let terms = ContractTerms::builder()
///     .strike(1.0)
///     .notional(100.0)
///     .upfront_premium(0.0)
///     .discount_rate(0.0)
///     .observation_interval(1)
///     .build()
///     .unwrap();
///
/// let engine = PayoffEngine::new(&matrix, &terms).unwrap();
/// assert!(engine.results().iter().all(|r| r.early_exited && r.payoff == 0.0));
/// assert_eq!(engine.statistics().early_exit_probability, 1.0);
/// ```
#[derive(Debug)]
pub struct PayoffEngine<'a> {
    matrix: &'a PriceMatrix,
    terms: ContractTerms,
    quota: ExitQuota,
    observations: usize,
    results: Vec<PathResult>,
    statistics: AggregateStatistics,
}

impl<'a> PayoffEngine<'a> {
    /// Scans every path with the reference [`ExitQuota::Sequential`] policy.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if the terms are invalid or the matrix holds
    /// fewer than two paths.
    pub fn new(matrix: &'a PriceMatrix, terms: &ContractTerms) -> Result<Self, PricingError> {
        Self::with_quota(matrix, terms, ExitQuota::Sequential)
    }

    /// Scans every path under the given quota policy.
    ///
    /// # Errors
    ///
    /// Returns `PricingError` if the terms are invalid or the matrix holds
    /// fewer than two paths.
    pub fn with_quota(
        matrix: &'a PriceMatrix,
        terms: &ContractTerms,
        quota: ExitQuota,
    ) -> Result<Self, PricingError> {
        terms.validate()?;
        if matrix.n_paths() <= 1 {
            return Err(PricingError::DegenerateStatistics {
                n_samples: matrix.n_paths(),
            });
        }

        let observations = terms.observation_count(matrix.path_len());
        if observations < terms.max_observations() {
            debug!(
                requested = terms.max_observations(),
                scanned = observations,
                path_len = matrix.path_len(),
                "observation count clamped to path length"
            );
        }

        let results = match quota {
            ExitQuota::Sequential => scan_sequential(matrix, terms, observations),
            ExitQuota::Disabled => scan_parallel(matrix, terms, observations),
        };
        let statistics = AggregateStatistics::from_results(&results)?;

        debug!(
            n_paths = statistics.n_paths,
            ?quota,
            mean = statistics.mean,
            early_exits = statistics.early_exit_count,
            "payoff scan complete"
        );

        Ok(Self {
            matrix,
            terms: terms.clone(),
            quota,
            observations,
            results,
            statistics,
        })
    }

    /// Returns the borrowed matrix.
    #[inline]
    pub fn matrix(&self) -> &'a PriceMatrix {
        self.matrix
    }

    /// Returns the terms the engine was built with.
    #[inline]
    pub fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    /// Returns the quota policy.
    #[inline]
    pub fn quota(&self) -> ExitQuota {
        self.quota
    }

    /// Number of observations scanned per path after clamping.
    #[inline]
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Per-path results in path-index order.
    #[inline]
    pub fn results(&self) -> &[PathResult] {
        &self.results
    }

    /// Per-path payoffs in path-index order.
    pub fn payoffs(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.payoff).collect()
    }

    /// Aggregate statistics.
    #[inline]
    pub fn statistics(&self) -> &AggregateStatistics {
        &self.statistics
    }

    /// Consumes the engine, returning the statistics.
    #[inline]
    pub fn into_statistics(self) -> AggregateStatistics {
        self.statistics
    }
}

/// Prices `matrix` under `terms` with the sequential quota.
///
/// # Errors
///
/// See [`PayoffEngine::new`].
///
/// # Examples
///
/// ```rust
/// use pricer_kof::mc::{generate, SimulationParameters};
/// use pricer_kof::note::{evaluate, ContractTerms};
///
/// let params = SimulationParameters::builder().n_paths(200).build().unwrap();
/// let matrix = generate(&params).unwrap();
/// let stats = evaluate(&matrix, &ContractTerms::default()).unwrap();
///
/// assert!(stats.early_exit_count <= 200);
/// ```
pub fn evaluate(
    matrix: &PriceMatrix,
    terms: &ContractTerms,
) -> Result<AggregateStatistics, PricingError> {
    PayoffEngine::new(matrix, terms).map(PayoffEngine::into_statistics)
}

fn scan_sequential(
    matrix: &PriceMatrix,
    terms: &ContractTerms,
    observations: usize,
) -> Vec<PathResult> {
    let mut exits_so_far = 0usize;
    matrix
        .paths()
        .map(|path| {
            let result = scan_path(path, terms, observations, exits_so_far >= terms.target_count());
            exits_so_far += usize::from(result.early_exited);
            result
        })
        .collect()
}

fn scan_parallel(
    matrix: &PriceMatrix,
    terms: &ContractTerms,
    observations: usize,
) -> Vec<PathResult> {
    matrix
        .as_slice()
        .par_chunks_exact(matrix.path_len())
        .map(|path| scan_path(path, terms, observations, false))
        .collect()
}

/// Walks one path. `quota_reached` is constant for the whole scan because
/// only earlier paths contribute to the count.
fn scan_path(
    path: &[f64],
    terms: &ContractTerms,
    observations: usize,
    quota_reached: bool,
) -> PathResult {
    let strike = terms.strike();
    let notional = terms.notional();
    let leverage = terms.leverage();

    let mut cash_flow = 0.0;
    let mut early_exited = false;

    for month in 1..=observations {
        let day = terms.observation_day(month);
        if day >= path.len() {
            break;
        }

        let spot = path[day];
        let intrinsic = (strike - spot).max(0.0);
        let df = terms.discount_factor(day);

        if spot >= strike {
            cash_flow += (notional * spot - notional * strike) * df;
            early_exited = true;
            break;
        }

        cash_flow += (notional * leverage * spot - notional * leverage * strike) * df;

        if intrinsic <= terms.target() || quota_reached {
            early_exited = true;
            break;
        }
    }

    PathResult::new(cash_flow + terms.discounted_premium(), early_exited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::terms::ContractTermsBuilder;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn flat_terms(strike: f64) -> ContractTermsBuilder {
        ContractTerms::builder()
            .strike(strike)
            .notional(100.0)
            .upfront_premium(0.0)
            .leverage(2.0)
            .discount_rate(0.0)
            .observation_interval(1)
            .max_observations(12)
            .delay_days(0)
            .target_count(10)
            .target(0.0)
    }

    #[test]
    fn test_knock_out_at_strike_pays_nothing() {
        let matrix = PriceMatrix::from_rows(vec![vec![1.0; 13]; 10]).unwrap();
        let terms = flat_terms(1.0).build().unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();
        let stats = engine.statistics();

        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.early_exit_probability, 1.0);
        assert_eq!(stats.early_exit_count, 10);
        assert_eq!(engine.observations(), 12);
    }

    #[test]
    fn test_knock_out_above_strike_settles_gain() {
        // Path is above the strike on day 2 (first observation with interval 2).
        let matrix = PriceMatrix::from_rows(vec![
            vec![1.0, 1.0, 1.2, 1.0, 1.0],
            vec![1.0, 1.0, 1.2, 1.0, 1.0],
        ])
        .unwrap();
        let terms = flat_terms(1.1)
            .observation_interval(2)
            .discount_rate(0.0252)
            .build()
            .unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();
        let expected = (100.0 * 1.2 - 100.0 * 1.1) * (-0.0252_f64 * 2.0 / 252.0).exp();

        assert_eq!(engine.observations(), 1);
        for result in engine.results() {
            assert!(result.early_exited);
            assert_relative_eq!(result.payoff, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_leveraged_losses_accrue_until_maturity() {
        // Spot 0.5 below strike 1.0 with target 0: intrinsic 0.5 > 0, never exits.
        let matrix = PriceMatrix::from_rows(vec![vec![0.5; 13]; 3]).unwrap();
        let terms = flat_terms(1.0).upfront_premium(10.0).build().unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();
        let per_observation = 100.0 * 2.0 * 0.5 - 100.0 * 2.0 * 1.0;

        for result in engine.results() {
            assert!(!result.early_exited);
            assert_relative_eq!(result.payoff, 12.0 * per_observation + 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_target_triggers_exit_after_accrual() {
        // Intrinsic 0.05 <= target 0.1: accrue once, then exit.
        let matrix = PriceMatrix::from_rows(vec![vec![0.95; 13]; 2]).unwrap();
        let terms = flat_terms(1.0).target(0.1).build().unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();
        let expected = 100.0 * 2.0 * 0.95 - 100.0 * 2.0 * 1.0;

        for result in engine.results() {
            assert!(result.early_exited);
            assert_relative_eq!(result.payoff, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sequential_quota_counts_only_earlier_paths() {
        // Paths 0 and 2 knock out; with target_count = 2 every later path
        // stops after its first loss-accruing observation.
        let up = vec![1.0, 1.5, 1.5, 1.5, 1.5];
        let down = vec![1.0, 0.5, 0.5, 0.5, 0.5];
        let matrix =
            PriceMatrix::from_rows(vec![up.clone(), down.clone(), up, down.clone(), down])
                .unwrap();
        let terms = flat_terms(1.0).max_observations(4).target_count(2).build().unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();
        let results = engine.results();
        let loss = 100.0 * 2.0 * 0.5 - 100.0 * 2.0 * 1.0;

        // Path 1 sees one earlier exit: full scan of all 4 observations.
        assert_eq!(engine.observations(), 4);
        assert!(!results[1].early_exited);
        assert_relative_eq!(results[1].payoff, 4.0 * loss, epsilon = 1e-12);

        // Paths 3 and 4 see two earlier exits: one observation, then exit.
        for result in &results[3..] {
            assert!(result.early_exited);
            assert_relative_eq!(result.payoff, loss, epsilon = 1e-12);
        }
        assert_eq!(engine.statistics().early_exit_count, 4);
    }

    #[test]
    fn test_disabled_quota_ignores_earlier_exits() {
        let up = vec![1.0, 1.5, 1.5, 1.5, 1.5];
        let down = vec![1.0, 0.5, 0.5, 0.5, 0.5];
        let matrix = PriceMatrix::from_rows(vec![up.clone(), up, down.clone(), down]).unwrap();
        let terms = flat_terms(1.0).max_observations(4).target_count(1).build().unwrap();

        let engine = PayoffEngine::with_quota(&matrix, &terms, ExitQuota::Disabled).unwrap();
        let loss = 100.0 * 2.0 * 0.5 - 100.0 * 2.0 * 1.0;

        assert_eq!(engine.quota(), ExitQuota::Disabled);
        for result in &engine.results()[2..] {
            assert!(!result.early_exited);
            assert_relative_eq!(result.payoff, 4.0 * loss, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_policies_agree_when_quota_unreachable() {
        let rows: Vec<Vec<f64>> = (0..50)
            .map(|i| {
                let drift: f64 = if i % 3 == 0 { 1.01 } else { 0.99 };
                (0..41).map(|d| drift.powi(d)).collect()
            })
            .collect();
        let matrix = PriceMatrix::from_rows(rows).unwrap();
        let terms = flat_terms(1.0)
            .observation_interval(5)
            .target_count(1_000)
            .build()
            .unwrap();

        let sequential = PayoffEngine::new(&matrix, &terms).unwrap();
        let parallel = PayoffEngine::with_quota(&matrix, &terms, ExitQuota::Disabled).unwrap();

        assert_eq!(sequential.results(), parallel.results());
    }

    #[test]
    fn test_delay_past_path_end_stops_scan() {
        // Interval 2 on 7 prices allows 2 observations, but a delay of 4 puts
        // the second one on day 8, beyond the path.
        let matrix = PriceMatrix::from_rows(vec![vec![0.5; 7]; 2]).unwrap();
        let terms = flat_terms(1.0)
            .observation_interval(2)
            .delay_days(4)
            .build()
            .unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();
        let loss = 100.0 * 2.0 * 0.5 - 100.0 * 2.0 * 1.0;

        assert_eq!(engine.observations(), 2);
        for result in engine.results() {
            assert!(!result.early_exited);
            assert_relative_eq!(result.payoff, loss, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_huge_delay_stops_scan() {
        let matrix = PriceMatrix::from_rows(vec![vec![0.5; 13]; 2]).unwrap();
        let terms = flat_terms(1.0)
            .upfront_premium(5.0)
            .delay_days(usize::MAX)
            .build()
            .unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();

        assert_eq!(engine.observations(), 12);
        for result in engine.results() {
            assert!(!result.early_exited);
            assert_relative_eq!(result.payoff, 5.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_premium_added_without_observations() {
        let matrix = PriceMatrix::from_rows(vec![vec![1.0; 3]; 2]).unwrap();
        let terms = flat_terms(1.0)
            .observation_interval(5)
            .upfront_premium(252.0)
            .discount_rate(1.0)
            .build()
            .unwrap();

        let engine = PayoffEngine::new(&matrix, &terms).unwrap();

        assert_eq!(engine.observations(), 0);
        for result in engine.results() {
            assert!(!result.early_exited);
            assert_relative_eq!(result.payoff, 252.0 * (-1.0_f64 / 252.0).exp(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_single_path_is_degenerate() {
        let matrix = PriceMatrix::from_rows(vec![vec![1.0; 13]]).unwrap();
        let err = evaluate(&matrix, &flat_terms(1.0).build().unwrap()).unwrap_err();
        assert_eq!(err, PricingError::DegenerateStatistics { n_samples: 1 });
    }

    #[test]
    fn test_engine_exposes_borrowed_inputs() {
        let matrix = PriceMatrix::from_rows(vec![vec![1.0; 13]; 2]).unwrap();
        let terms = flat_terms(1.0).build().unwrap();
        let engine = PayoffEngine::new(&matrix, &terms).unwrap();

        assert!(std::ptr::eq(engine.matrix(), &matrix));
        assert_eq!(engine.terms(), &terms);
        assert_eq!(engine.payoffs(), vec![0.0, 0.0]);
    }

    fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (2usize..30, 1usize..50).prop_flat_map(|(n_paths, path_len)| {
            prop::collection::vec(prop::collection::vec(0.5f64..1.5, path_len), n_paths)
        })
    }

    proptest! {
        #[test]
        fn prop_exit_statistics_bounded(
            rows in matrix_strategy(),
            interval in 1usize..6,
            max_observations in 0usize..30,
            delay in 0usize..5,
            target_count in 1usize..10,
            target in 0.0f64..0.3,
        ) {
            let n_paths = rows.len();
            let matrix = PriceMatrix::from_rows(rows).unwrap();
            let terms = flat_terms(1.0)
                .observation_interval(interval)
                .max_observations(max_observations)
                .delay_days(delay)
                .target_count(target_count)
                .target(target)
                .build()
                .unwrap();

            for quota in [ExitQuota::Sequential, ExitQuota::Disabled] {
                let engine = PayoffEngine::with_quota(&matrix, &terms, quota).unwrap();
                let stats = engine.statistics();

                prop_assert!(stats.early_exit_count <= n_paths);
                prop_assert!((0.0..=1.0).contains(&stats.early_exit_probability));
                prop_assert!(engine.observations() <= max_observations);
                prop_assert!(stats.standard_error >= 0.0);
                prop_assert_eq!(engine.results().len(), n_paths);
            }
        }
    }
}
