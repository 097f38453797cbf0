//! Command: print the effective configuration.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::{LevelHandle, Log};

/// Load the configuration the way `update` would and print it as JSON.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn run(global: &GlobalOpts, log: &dyn Log, level: &LevelHandle) -> Result<()> {
    let setup = CommandSetup::init(global, log, level);
    let json = setup
        .config
        .to_json_pretty()
        .context("serializing effective configuration")?;
    println!("{json}");
    Ok(())
}
