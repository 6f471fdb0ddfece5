//! Command-line interface module.

mod args;
pub mod transform;

pub use args::{Cli, Commands, TransformArgs};

use anyhow::Result;

use crate::config::AmpifyConfig;

/// Execute config command: print the default configuration.
pub fn print_config() -> Result<()> {
    print!("{}", AmpifyConfig::template()?);
    Ok(())
}
