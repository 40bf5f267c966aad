//! Config command implementation.
//!
//! Prints the effective configuration.

use crate::cli::ConfigFormat;
use crate::config::{show_config, Config};

/// Prints the effective configuration after file and CLI merging.
pub fn command_config(format: ConfigFormat, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    show_config(config, format)
}
