use anyhow::{bail, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::cli::commands::Command;
use crate::config::{ConfigAction, JqlConfig};

pub struct ConfigCommand {
    action: ConfigAction,
    config_path: PathBuf,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction, config_path: PathBuf) -> Self {
        Self {
            action,
            config_path,
        }
    }
}

#[async_trait]
impl Command for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        match &self.action {
            ConfigAction::Init { force } => {
                if !force && tokio::fs::try_exists(&self.config_path).await.unwrap_or(false) {
                    bail!(
                        "{} already exists. Use --force to overwrite it.",
                        self.config_path.display()
                    );
                }
                JqlConfig::default().save(&self.config_path).await?;
                println!("Configuration initialized at {}", self.config_path.display());
            }

            ConfigAction::Show => {
                let config = JqlConfig::load_or_default(&self.config_path).await?;
                print!("{}", toml::to_string_pretty(&config)?);
            }

            ConfigAction::Path => println!("{}", self.config_path.display()),
        }

        Ok(())
    }
}
