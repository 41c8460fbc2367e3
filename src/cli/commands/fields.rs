use anyhow::Result;
use async_trait::async_trait;
use colored::*;

use crate::cli::args::ReportFormat;
use crate::cli::commands::Command;
use crate::query::schema;

pub struct FieldsCommand {
    format: ReportFormat,
}

impl FieldsCommand {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }
}

#[async_trait]
impl Command for FieldsCommand {
    async fn execute(&self) -> Result<()> {
        match self.format {
            ReportFormat::Json => {
                println!("{}", serde_json::to_string_pretty(schema::fields())?)
            }
            ReportFormat::Text => {
                for field in schema::fields() {
                    let operators: Vec<&str> =
                        field.kind.operators().iter().map(|op| op.symbol()).collect();
                    println!(
                        "{:<16} {:<11} {:<40} {}",
                        field.name.cyan(),
                        field.kind.to_string(),
                        operators.join(" "),
                        field.description.dimmed()
                    );
                }
            }
        }

        Ok(())
    }
}
