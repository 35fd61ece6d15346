//! Error types for the pricing kernel.
//!
//! Two families are kept apart: invalid input (a caller contract violation
//! detected before any work starts) and degenerate statistics (a well-formed
//! matrix that is too small to estimate a sample standard error from).

use thiserror::Error;

/// Pricing kernel error.
///
/// # Examples
///
/// ```
/// use pricer_kof::mc::PricingError;
///
/// let err = PricingError::InvalidPathCount(0);
/// assert!(err.to_string().contains("Invalid path count 0"));
///
/// let err = PricingError::DegenerateStatistics { n_samples: 1 };
/// assert!(err.is_degenerate());
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Path count outside the valid range.
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),

    /// Step count outside the valid range.
    #[error("Invalid step count {0}: must be in range [1, 100_000]")]
    InvalidStepCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// Malformed price matrix (empty, ragged or non-positive prices).
    #[error("Invalid price matrix: {0}")]
    InvalidMatrix(String),

    /// Too few payoffs to compute a sample standard error.
    #[error("Degenerate statistics: {n_samples} payoff(s), need at least 2 for a sample standard error")]
    DegenerateStatistics {
        /// Number of payoffs available.
        n_samples: usize,
    },
}

impl PricingError {
    /// Returns `true` for the degenerate-statistics family.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateStatistics { .. })
    }

    /// Shorthand for [`PricingError::InvalidParameter`].
    pub(crate) fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}
