//! CLI error types

use pricer_kof::PricingError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `kof` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML output error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
