//! # Knock-Out Forward Pricer (Layer 3: Pricing Kernel)
//!
//! pricer_kof prices a leveraged knock-out forward note with monthly
//! autocall observation by Monte Carlo simulation of a single FX rate under
//! geometric Brownian motion.
//!
//! ## Pipeline
//!
//! ```text
//! SimulationParameters ──► generate() ──► PriceMatrix
//!                                              │ (borrowed)
//! ContractTerms ─────────────────────► PayoffEngine ──► AggregateStatistics
//! ```
//!
//! - [`mc`]: simulation parameters, errors and GBM path generation
//! - [`note`]: contract terms, the per-path payoff scan and statistics
//! - [`rng`]: seeded and entropy-seeded normal sources
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_kof::mc::{generate, SimulationParameters};
//! use pricer_kof::note::{evaluate, ContractTerms};
//!
//! let params = SimulationParameters::builder()
//!     .spot(1.375)
//!     .volatility(0.0713)
//!     .quote_rate(0.009)
//!     .base_rate(0.012)
//!     .maturity(1.0)
//!     .n_paths(500)
//!     .n_steps(240)
//!     .seed(123457)
//!     .build()
//!     .unwrap();
//!
//! let matrix = generate(&params).unwrap();
//! let terms = ContractTerms::default();
//! let stats = evaluate(&matrix, &terms).unwrap();
//!
//! assert!(stats.early_exit_probability >= 0.0 && stats.early_exit_probability <= 1.0);
//! println!("Value: {:.4} +/- {:.4}", stats.mean, stats.standard_error);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod mc;
pub mod note;
pub mod rng;

// Re-export commonly used items for convenience
pub use mc::{generate, PriceMatrix, PricingError, SimulationParameters};
pub use note::{evaluate, AggregateStatistics, ContractTerms, ExitQuota, PathResult, PayoffEngine};
pub use rng::{NormalSource, PricerRng};
