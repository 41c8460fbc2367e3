use anyhow::{bail, Result};
use async_trait::async_trait;
use colored::*;

use super::utils::query_or_stdin;
use crate::cli::args::ReportFormat;
use crate::cli::commands::Command;
use crate::query::{render_ansi, QueryEngine, ValidationResult};

pub struct ValidateCommand {
    engine: QueryEngine,
    query: Option<String>,
    format: ReportFormat,
}

impl ValidateCommand {
    pub fn new(engine: QueryEngine, query: Option<String>, format: ReportFormat) -> Self {
        Self {
            engine,
            query,
            format,
        }
    }
}

/// Text report for a validation result; the caret marks the error position
pub fn render_report(query: &str, result: &ValidationResult) -> String {
    let (Some(error), Some(position)) = (&result.error, result.error_position) else {
        return "Query is valid".to_string();
    };

    let column = query
        .get(..position)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(0);
    format!("{}\n{}^\n{}", query, " ".repeat(column), error)
}

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self) -> Result<()> {
        let query = query_or_stdin(self.query.as_deref()).await?;
        let result = self.engine.validate(&query);

        match self.format {
            ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            ReportFormat::Text if result.valid => {
                println!("{}", render_ansi(&query));
                println!("{}", "Query is valid".green());
            }
            ReportFormat::Text => eprintln!("{}", render_report(&query, &result).red()),
        }

        if !result.valid {
            bail!("Invalid query");
        }
        Ok(())
    }
}
