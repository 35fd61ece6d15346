//! Defaults command implementation
//!
//! Prints the built-in configuration as TOML, ready to be saved and edited.

use crate::config::KofConfig;
use crate::Result;

/// Render the default configuration
pub fn render() -> Result<String> {
    Ok(toml::to_string_pretty(&KofConfig::default())?)
}

/// Run the defaults command
pub fn run() -> Result<()> {
    print!("{}", render()?);
    Ok(())
}
