//! Platform-aware configuration paths

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const CONFIG_DIR_ENV: &str = "JQL_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "jql.toml";

/// Get the configuration directory for the current platform
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(custom_dir));
    }

    dirs::config_dir()
        .map(|p| p.join("jql"))
        .context("Unable to determine config directory for the current platform")
}

/// Default location of the configuration file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
