//! Pricer configuration management
//!
//! Handles loading configuration from TOML files, `KOF_*` environment
//! variables and CLI arguments.

use pricer_kof::mc::SimulationParameters;
use pricer_kof::note::{ContractTerms, ContractTermsBuilder, ExitQuota, OBSERVATIONS_PER_YEAR};
use pricer_kof::PricingError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the log level
pub const ENV_LOG_LEVEL: &str = "KOF_LOG_LEVEL";
/// Environment variable holding the path count
pub const ENV_NUM_PATHS: &str = "KOF_NUM_PATHS";
/// Environment variable holding a fixed seed
pub const ENV_SEED: &str = "KOF_SEED";

/// Errors raised while assembling a [`KofConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    InvalidLogLevel(String),

    #[error("config file: {0}")]
    FileError(String),

    #[error("environment: {0}")]
    EnvError(String),
}

/// Verbosity of `kof` diagnostics on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses an environment value, ignoring case
    pub fn from_env_value(value: &str) -> Result<Self, ConfigError> {
        <Self as clap::ValueEnum>::from_str(value.trim(), true)
            .map_err(|_| ConfigError::InvalidLogLevel(value.to_string()))
    }
}

/// Early-exit quota policy as written in configuration and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QuotaPolicy {
    /// Cross-path quota applied in path order
    #[default]
    Sequential,
    /// Quota ignored; paths evaluated in parallel
    Disabled,
}

impl From<QuotaPolicy> for ExitQuota {
    fn from(policy: QuotaPolicy) -> Self {
        match policy {
            QuotaPolicy::Sequential => ExitQuota::Sequential,
            QuotaPolicy::Disabled => ExitQuota::Disabled,
        }
    }
}

/// `[market]` section: GBM inputs for the FX rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Initial spot rate
    pub spot: f64,
    /// Annualised volatility
    pub volatility: f64,
    /// Quote-currency rate (r1)
    pub quote_rate: f64,
    /// Base-currency rate (r2)
    pub base_rate: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            spot: params.spot(),
            volatility: params.volatility(),
            quote_rate: params.quote_rate(),
            base_rate: params.base_rate(),
        }
    }
}

/// `[simulation]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of Monte Carlo paths
    pub num_paths: usize,
    /// Horizon in years
    pub maturity: f64,
    /// Time steps per path; `month_day * 12 * maturity` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
    /// Seed used when `seed_fixed` is set
    pub seed: u64,
    /// Use `seed` instead of OS entropy
    pub seed_fixed: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let params = SimulationParameters::default();
        Self {
            num_paths: params.n_paths(),
            maturity: params.maturity(),
            steps: None,
            seed: params.seed(),
            seed_fixed: params.seed_fixed(),
        }
    }
}

/// `[contract]` section: note terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub strike: f64,
    pub notional: f64,
    pub upfront_premium: f64,
    pub leverage: f64,
    /// Discount rate; the market quote rate when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    /// Trading days between observations
    pub month_day: usize,
    /// Maximum observations; twelve per year of maturity when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_max: Option<usize>,
    pub delay_day: usize,
    pub target_count: usize,
    pub target: f64,
    pub quota: QuotaPolicy,
}

impl Default for ContractConfig {
    fn default() -> Self {
        let terms = ContractTerms::default();
        Self {
            strike: terms.strike(),
            notional: terms.notional(),
            upfront_premium: terms.upfront_premium(),
            leverage: terms.leverage(),
            discount_rate: None,
            month_day: terms.observation_interval(),
            month_max: None,
            delay_day: terms.delay_days(),
            target_count: terms.target_count(),
            target: terms.target(),
            quota: QuotaPolicy::default(),
        }
    }
}

/// Complete pricer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KofConfig {
    pub log_level: LogLevel,
    pub market: MarketConfig,
    pub simulation: SimulationConfig,
    pub contract: ContractConfig,
}

impl KofConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `KOF_*` environment overrides resolved through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_env_value(&level)?;
        }

        if let Some(paths) = lookup(ENV_NUM_PATHS) {
            self.simulation.num_paths = paths.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{}={} is not a path count", ENV_NUM_PATHS, paths))
            })?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            self.simulation.seed = seed.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{}={} is not an unsigned seed", ENV_SEED, seed))
            })?;
            self.simulation.seed_fixed = true;
        }

        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if let Some(paths) = cli.paths {
            self.simulation.num_paths = paths;
        }
        if let Some(steps) = cli.steps {
            self.simulation.steps = Some(steps);
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = seed;
            self.simulation.seed_fixed = true;
        }
        if cli.entropy {
            self.simulation.seed_fixed = false;
        }
        if let Some(tenor) = cli.tenor {
            self.simulation.maturity = tenor;
        }
        if let Some(quota) = cli.quota {
            self.contract.quota = quota;
        }
    }

    /// Time steps per path, derived from the observation schedule unless set
    pub fn n_steps(&self) -> usize {
        self.simulation.steps.unwrap_or_else(|| {
            let days = self.contract.month_day as f64 * OBSERVATIONS_PER_YEAR;
            (days * self.simulation.maturity).round().max(0.0) as usize
        })
    }

    /// Validated simulation parameters
    pub fn simulation_parameters(&self) -> Result<SimulationParameters, PricingError> {
        SimulationParameters::builder()
            .spot(self.market.spot)
            .volatility(self.market.volatility)
            .quote_rate(self.market.quote_rate)
            .base_rate(self.market.base_rate)
            .maturity(self.simulation.maturity)
            .n_paths(self.simulation.num_paths)
            .n_steps(self.n_steps())
            .seed(self.simulation.seed)
            .seed_fixed(self.simulation.seed_fixed)
            .build()
    }

    /// Validated contract terms
    pub fn contract_terms(&self) -> Result<ContractTerms, PricingError> {
        let contract = &self.contract;
        let builder: ContractTermsBuilder = ContractTerms::builder()
            .strike(contract.strike)
            .notional(contract.notional)
            .upfront_premium(contract.upfront_premium)
            .leverage(contract.leverage)
            .discount_rate(contract.discount_rate.unwrap_or(self.market.quote_rate))
            .observation_interval(contract.month_day)
            .delay_days(contract.delay_day)
            .target_count(contract.target_count)
            .target(contract.target);

        match contract.month_max {
            Some(count) => builder.max_observations(count),
            None => builder.max_observations_for_tenor(self.simulation.maturity),
        }
        .build()
    }
}

/// CLI overrides
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<LogLevel>,
    /// Path count override
    pub paths: Option<usize>,
    /// Step count override
    pub steps: Option<usize>,
    /// Fixed seed override
    pub seed: Option<u64>,
    /// Seed from OS entropy
    pub entropy: bool,
    /// Maturity override in years
    pub tenor: Option<f64>,
    /// Quota policy override
    pub quota: Option<QuotaPolicy>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<KofConfig, ConfigError> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with environment lookups routed through `lookup`
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<KofConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => KofConfig::from_file(path)?,
        None => KofConfig::default(),
    };

    config.apply_env_from(lookup)?;
    config.merge_with_cli(cli);

    Ok(config)
}
