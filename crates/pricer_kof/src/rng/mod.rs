//! # Random Number Generation
//!
//! Normal variate sources for path generation.
//!
//! - **Reproducibility**: seeded generators always replay the same sequence
//! - **Pluggability**: path generation only needs a [`NormalSource`], so test
//!   doubles and alternative generators share one algorithm body
//! - **Isolation**: every simulation run owns its own generator instance
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_kof::rng::{NormalSource, PricerRng};
//!
//! // Seeded generator for reproducible simulations
//! let mut rng = PricerRng::from_seed(12345);
//! let z = rng.next_normal();
//!
//! // Batch generation into a pre-allocated buffer
//! let mut buffer = vec![0.0; 1000];
//! rng.fill_normal(&mut buffer);
//! # let _ = z;
//! ```

mod prng;
mod source;

pub use prng::PricerRng;
pub use source::NormalSource;
