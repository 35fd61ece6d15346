//! Leveraged knock-out forward note valuation.
//!
//! - [`terms`]: the contract's economic terms and observation schedule
//! - [`engine`]: per-path scan producing discounted payoffs and exit flags
//! - [`stats`]: mean, standard error, early-exit frequency and tail quantile
//!
//! # Examples
//!
//! ```rust
//! use pricer_kof::mc::{generate, SimulationParameters};
//! use pricer_kof::note::{ContractTerms, ExitQuota, PayoffEngine};
//!
//! let params = SimulationParameters::builder()
//!     .n_paths(1_000)
//!     .n_steps(240)
//!     .seed(123457)
//!     .build()
//!     .unwrap();
//! let matrix = generate(&params).unwrap();
//!
//! let terms = ContractTerms::builder()
//!     .strike(1.335)
//!     .discount_rate(params.quote_rate())
//!     .max_observations_for_tenor(params.maturity())
//!     .build()
//!     .unwrap();
//!
//! let engine = PayoffEngine::with_quota(&matrix, &terms, ExitQuota::Sequential).unwrap();
//! let stats = engine.statistics();
//! println!(
//!     "value {:.4}, stderr {:.4}, exits {} ({:.2}%), 5% tail {:.4}",
//!     stats.mean,
//!     stats.standard_error,
//!     stats.early_exit_count,
//!     stats.early_exit_percent(),
//!     stats.tail_quantile,
//! );
//! ```

pub mod engine;
pub mod stats;
pub mod terms;

pub use engine::{evaluate, ExitQuota, PathResult, PayoffEngine};
pub use stats::{AggregateStatistics, TAIL_PROBABILITY};
pub use terms::{ContractTerms, ContractTermsBuilder, OBSERVATIONS_PER_YEAR, TRADING_DAYS_PER_YEAR};
