use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use super::utils::read_records;
use crate::cli::commands::Command;
use crate::config::JqlConfig;
use crate::history::MemoryStore;
use crate::query::InteractiveRepl;

pub struct ReplCommand {
    config: JqlConfig,
    records: Option<PathBuf>,
}

impl ReplCommand {
    pub fn new(config: JqlConfig, records: Option<PathBuf>) -> Self {
        Self { config, records }
    }
}

#[async_trait]
impl Command for ReplCommand {
    async fn execute(&self) -> Result<()> {
        // stdin belongs to the prompt, so records only come from a file
        let records = match &self.records {
            Some(path) => read_records(Some(path)).await?,
            None => Vec::new(),
        };

        let mut repl = InteractiveRepl::new(&self.config, Arc::new(MemoryStore::new()))
            .with_records(records);
        repl.run()
    }
}
