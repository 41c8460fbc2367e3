use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use super::utils::read_records;
use crate::cli::commands::Command;
use crate::query::{Evaluator, QueryEngine};

pub struct FilterCommand {
    engine: QueryEngine,
    query: String,
    input: Option<PathBuf>,
    limit: Option<usize>,
}

impl FilterCommand {
    pub fn new(
        engine: QueryEngine,
        query: String,
        input: Option<PathBuf>,
        limit: Option<usize>,
    ) -> Self {
        Self {
            engine,
            query,
            input,
            limit,
        }
    }
}

#[async_trait]
impl Command for FilterCommand {
    async fn execute(&self) -> Result<()> {
        let expr = self
            .engine
            .parse(&self.query)
            .map_err(|e| anyhow!("Invalid query at position {}: {}", e.position(), e))?;
        let records = read_records(self.input.as_deref()).await?;

        let matched = Evaluator::new().filter(expr.as_ref(), &records);
        info!(matched = matched.len(), total = records.len(), "filtered records");

        let shown: Vec<_> = match self.limit {
            Some(limit) => matched.into_iter().take(limit).collect(),
            None => matched,
        };
        println!("{}", serde_json::to_string_pretty(&shown)?);

        Ok(())
    }
}
