//! Monte Carlo path simulation.
//!
//! # Architecture
//!
//! ```text
//! SimulationParameters  (validated model + dimensions + seeding)
//! ├── PricerRng / NormalSource  (normal draws)
//! └── generate()  ──►  PriceMatrix  (n_paths × (n_steps + 1), row-major)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use pricer_kof::mc::{generate, SimulationParameters};
//!
//! let params = SimulationParameters::builder()
//!     .spot(1.1824)
//!     .volatility(0.0713)
//!     .quote_rate(0.009)
//!     .base_rate(0.012)
//!     .maturity(1.0)
//!     .n_paths(1_000)
//!     .n_steps(240)
//!     .build()
//!     .unwrap();
//!
//! let matrix = generate(&params).unwrap();
//! assert!(matrix.paths().all(|path| path[0] == 1.1824));
//! ```

pub mod config;
pub mod error;
pub mod matrix;
pub mod paths;

// Re-exports for convenient access
pub use config::{
    SimulationParameters, SimulationParametersBuilder, DEFAULT_SEED, MAX_PATHS, MAX_STEPS,
};
pub use error::PricingError;
pub use matrix::PriceMatrix;
pub use paths::{generate, generate_with_source};
