use anyhow::Result;
use async_trait::async_trait;

use crate::cli::args::TokenFormat;
use crate::cli::commands::Command;
use crate::query::{Highlighter, QueryEngine, Token};

pub struct TokensCommand {
    engine: QueryEngine,
    query: String,
    format: TokenFormat,
}

impl TokensCommand {
    pub fn new(engine: QueryEngine, query: String, format: TokenFormat) -> Self {
        Self {
            engine,
            query,
            format,
        }
    }
}

pub fn format_table(tokens: &[Token]) -> String {
    let mut table = format!("{:<9} {:<10} {}\n", "KIND", "SPAN", "TEXT");
    for token in tokens {
        table.push_str(&format!(
            "{:<9} {:<10} {}\n",
            token.kind.as_str(),
            format!("{}..{}", token.start, token.end),
            token.text
        ));
    }
    table
}

#[async_trait]
impl Command for TokensCommand {
    async fn execute(&self) -> Result<()> {
        match self.format {
            TokenFormat::Json => {
                let tokens = self.engine.syntax_tokens(&self.query);
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            }
            TokenFormat::Table => print!("{}", format_table(&self.engine.tokenize(&self.query))),
            TokenFormat::Color => {
                let tokens = self.engine.tokenize(&self.query);
                println!("{}", Highlighter::new(true).render_tokens(&self.query, &tokens));
            }
        }

        Ok(())
    }
}
