pub mod links;
pub mod ping;
pub mod schedule;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;

use kitis::config::Config;

// Re-export command functions for convenience
pub use links::links;
pub use ping::ping;
pub use schedule::schedule;
pub use serve::serve;

/// Load configuration from a TOML file if given, otherwise from the environment
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
