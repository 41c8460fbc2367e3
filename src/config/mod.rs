//! Configuration for the `jql` binary
//!
//! Stored as TOML. Every section has defaults, so a partial file (or no
//! file at all) yields a usable configuration.

pub mod paths;

pub use paths::{config_dir, config_file};

use crate::error::ConfigError;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Configuration actions
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Upper bound on suggestions; 0 means unlimited
    pub max_suggestions: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self { max_suggestions: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Queries kept in session history
    pub history_size: usize,
    pub color: bool,
    /// Records printed per query
    pub display_limit: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_size: 10,
            color: true,
            display_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JqlConfig {
    pub completion: CompletionConfig,
    pub cache: CacheConfig,
    pub repl: ReplConfig,
}

impl JqlConfig {
    /// Load from `path`, falling back to defaults when the file is absent
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::load(path).await
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a TOML file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                }
                .into())
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()))
            }
        };
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub async fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.max_entries".to_string(),
                value: self.cache.max_entries.to_string(),
                reason: "must be greater than 0 when the cache is enabled".to_string(),
            });
        }

        if self.repl.display_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "repl.display_limit".to_string(),
                value: self.repl.display_limit.to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.repl.history_size > 1000 {
            return Err(ConfigError::InvalidValue {
                field: "repl.history_size".to_string(),
                value: self.repl.history_size.to_string(),
                reason: "must be at most 1000".to_string(),
            });
        }

        Ok(())
    }
}
