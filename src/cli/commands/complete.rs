use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::cli::args::ReportFormat;
use crate::cli::commands::Command;
use crate::query::QueryEngine;

pub struct CompleteCommand {
    engine: QueryEngine,
    query: String,
    cursor: Option<usize>,
    format: ReportFormat,
}

impl CompleteCommand {
    pub fn new(
        engine: QueryEngine,
        query: String,
        cursor: Option<usize>,
        format: ReportFormat,
    ) -> Self {
        Self {
            engine,
            query,
            cursor,
            format,
        }
    }
}

#[async_trait]
impl Command for CompleteCommand {
    async fn execute(&self) -> Result<()> {
        let cursor = self.cursor.unwrap_or(self.query.len());
        let completion = self.engine.complete(&self.query, cursor).ok_or_else(|| {
            anyhow!(
                "Cursor {} is not a character boundary of a {}-byte query",
                cursor,
                self.query.len()
            )
        })?;

        match self.format {
            ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&completion)?),
            ReportFormat::Text => {
                for suggestion in &completion.suggestions {
                    println!("{}", suggestion);
                }
            }
        }

        Ok(())
    }
}
