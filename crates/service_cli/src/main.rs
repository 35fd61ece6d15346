//! KOF CLI - Command Line Pricing for Leveraged Knock-Out Forwards
//!
//! This is the operational entry point for the `pricer_kof` library.
//!
//! # Commands
//!
//! - `kof price` - Simulate the configured market and price the note
//! - `kof defaults` - Print the default configuration as TOML
//!
//! # Configuration
//!
//! Inputs come from a TOML file (`--config` or `KOF_CONFIG`), then
//! `KOF_LOG_LEVEL`, `KOF_NUM_PATHS` and `KOF_SEED`, then command-line flags.
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires configuration and
//! output formatting around the pricing layer.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use commands::OutputFormat;
use config::{build_config, CliArgs, LogLevel, QuotaPolicy};
pub use error::{CliError, Result};

/// Leveraged knock-out forward pricer
#[derive(Parser)]
#[command(name = "kof")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, env = "KOF_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the configured note
    Price {
        /// Number of Monte Carlo paths
        #[arg(short = 'n', long)]
        paths: Option<usize>,

        /// Time steps per path (defaults to 12 observations a year)
        #[arg(long)]
        steps: Option<usize>,

        /// Fixed seed for reproducible runs
        #[arg(long, conflicts_with = "entropy")]
        seed: Option<u64>,

        /// Seed from OS entropy
        #[arg(long)]
        entropy: bool,

        /// Maturity in years
        #[arg(short, long)]
        tenor: Option<f64>,

        /// Early-exit quota policy
        #[arg(short, long, value_enum)]
        quota: Option<QuotaPolicy>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the default configuration as TOML
    Defaults,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Price {
            paths,
            steps,
            seed,
            entropy,
            tenor,
            quota,
            format,
        } => {
            let args = CliArgs {
                config_file: cli.config,
                log_level: cli.log_level,
                paths,
                steps,
                seed,
                entropy,
                tenor,
                quota,
            };
            let config = build_config(&args)?;

            let level = if cli.verbose && config.log_level != LogLevel::Trace {
                LogLevel::Debug
            } else {
                config.log_level
            };
            init_tracing(level.directive());

            info!(
                config_file = ?args.config_file,
                log_level = level.directive(),
                "Configuration loaded"
            );
            debug!(?config, "Effective configuration");

            commands::price::run(&config, format)
        }
        Commands::Defaults => commands::defaults::run(),
    }
}
