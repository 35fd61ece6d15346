//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod defaults;
pub mod price;

/// Output format for pricing results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON report
    Json,
}
