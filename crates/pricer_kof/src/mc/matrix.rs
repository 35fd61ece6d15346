//! Simulated price paths.
//!
//! # Memory Layout
//!
//! Paths are stored in one contiguous row-major buffer:
//! `prices[path_idx * path_len + step_idx]`, where `step_idx = 0` holds the
//! initial spot and `path_len = n_steps + 1`.

use super::error::PricingError;

/// Matrix of simulated trajectories, one row per path.
///
/// Every row has the same length and every price is strictly positive.
/// The engine only ever borrows a matrix, so the buffer is never copied
/// after generation.
///
/// # Examples
///
/// ```rust
/// use pricer_kof::mc::PriceMatrix;
///
/// let matrix = PriceMatrix::from_rows(vec![
///     vec![1.0, 1.1, 1.2],
///     vec![1.0, 0.9, 0.8],
/// ])
/// .unwrap();
///
/// assert_eq!(matrix.n_paths(), 2);
/// assert_eq!(matrix.path_len(), 3);
/// assert_eq!(matrix.path(1), &[1.0, 0.9, 0.8]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PriceMatrix {
    prices: Vec<f64>,
    n_paths: usize,
    path_len: usize,
}

impl PriceMatrix {
    /// Wraps a row-major buffer produced by the generator.
    pub(crate) fn from_raw(prices: Vec<f64>, n_paths: usize, path_len: usize) -> Self {
        debug_assert_eq!(prices.len(), n_paths * path_len);
        debug_assert!(path_len > 0);
        Self {
            prices,
            n_paths,
            path_len,
        }
    }

    /// Builds a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidMatrix`] if there are no rows, a row is
    /// empty, rows differ in length, or any price is not positive and finite.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, PricingError> {
        let path_len = match rows.first() {
            Some(first) => first.len(),
            None => return Err(PricingError::InvalidMatrix("no paths".to_string())),
        };
        if path_len == 0 {
            return Err(PricingError::InvalidMatrix(
                "paths must contain at least the initial price".to_string(),
            ));
        }

        let n_paths = rows.len();
        let mut prices = Vec::with_capacity(n_paths * path_len);
        for (path_idx, row) in rows.into_iter().enumerate() {
            if row.len() != path_len {
                return Err(PricingError::InvalidMatrix(format!(
                    "path {} has length {}, expected {}",
                    path_idx,
                    row.len(),
                    path_len
                )));
            }
            if let Some(step) = row.iter().position(|&p| !(p > 0.0 && p.is_finite())) {
                return Err(PricingError::InvalidMatrix(format!(
                    "path {} step {} holds non-positive price {}",
                    path_idx, step, row[step]
                )));
            }
            prices.extend(row);
        }

        Ok(Self::from_raw(prices, n_paths, path_len))
    }

    /// Returns the number of paths (rows).
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the length of every path, initial price included.
    #[inline]
    pub fn path_len(&self) -> usize {
        self.path_len
    }

    /// Returns the number of simulated steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.path_len - 1
    }

    /// Returns path `path_idx` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `path_idx >= n_paths()`.
    #[inline]
    pub fn path(&self, path_idx: usize) -> &[f64] {
        let offset = path_idx * self.path_len;
        &self.prices[offset..offset + self.path_len]
    }

    /// Returns the price at (`path_idx`, `step_idx`), if in range.
    #[inline]
    pub fn get(&self, path_idx: usize, step_idx: usize) -> Option<f64> {
        if path_idx < self.n_paths && step_idx < self.path_len {
            Some(self.prices[path_idx * self.path_len + step_idx])
        } else {
            None
        }
    }

    /// Iterates over paths in index order.
    #[inline]
    pub fn paths(&self) -> std::slice::ChunksExact<'_, f64> {
        self.prices.chunks_exact(self.path_len)
    }

    /// Returns the whole row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }

    /// Extracts the terminal price of every path.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.paths().map(|path| path[self.path_len - 1]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_layout() {
        let matrix =
            PriceMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

        assert_eq!(matrix.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(matrix.n_steps(), 2);
        assert_eq!(matrix.get(1, 0), Some(4.0));
        assert_eq!(matrix.get(1, 3), None);
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.terminal_prices(), vec![3.0, 6.0]);
        assert_eq!(matrix.paths().len(), 2);
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert!(matches!(
            PriceMatrix::from_rows(vec![]),
            Err(PricingError::InvalidMatrix(_))
        ));
        assert!(matches!(
            PriceMatrix::from_rows(vec![vec![], vec![]]),
            Err(PricingError::InvalidMatrix(_))
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = PriceMatrix::from_rows(vec![vec![1.0, 1.0], vec![1.0]]).unwrap_err();
        assert!(err.to_string().contains("path 1 has length 1"));
    }

    #[test]
    fn test_from_rows_rejects_non_positive() {
        assert!(PriceMatrix::from_rows(vec![vec![1.0, 0.0]]).is_err());
        assert!(PriceMatrix::from_rows(vec![vec![1.0, -2.0]]).is_err());
        assert!(PriceMatrix::from_rows(vec![vec![1.0, f64::NAN]]).is_err());
    }
}
