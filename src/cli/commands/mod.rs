use anyhow::Result;
use async_trait::async_trait;

pub mod complete;
pub mod config;
pub mod fields;
pub mod filter;
pub mod repl;
pub mod tokens;
pub mod validate;

/// Trait for CLI command implementations
#[async_trait]
pub trait Command {
    /// Execute the command with the given arguments
    async fn execute(&self) -> Result<()>;
}

/// Common utilities for command implementations
pub mod utils {
    use crate::error::JqlError;
    use anyhow::{bail, Result};
    use serde_json::Value;
    use std::io::{self, Read};
    use std::path::Path;

    pub async fn read_stdin() -> Result<String> {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| JqlError::io("read stdin", e))?;
        Ok(buffer)
    }

    /// Query text from the argument, or stdin when piped
    pub async fn query_or_stdin(query: Option<&str>) -> Result<String> {
        match query {
            Some(query) => Ok(query.to_string()),
            None if atty::isnt(atty::Stream::Stdin) => {
                Ok(read_stdin().await?.trim_end_matches(['\r', '\n']).to_string())
            }
            None => bail!("No query given. Pass one as an argument or pipe it on stdin."),
        }
    }

    /// Load a JSON array of records from a file or stdin
    pub async fn read_records(path: Option<&Path>) -> Result<Vec<Value>> {
        let content = match path {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| JqlError::io(format!("read {}", path.display()), e))?,
            None if atty::isnt(atty::Stream::Stdin) => read_stdin().await?,
            None => bail!("No records given. Use --input or pipe JSON on stdin."),
        };
        parse_records(&content)
    }

    /// Accept a JSON array, or a single object as a one-record list
    pub fn parse_records(content: &str) -> Result<Vec<Value>> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| JqlError::json("parse records", e))?;

        match value {
            Value::Array(records) => Ok(records),
            record @ Value::Object(_) => Ok(vec![record]),
            other => bail!("Expected a JSON array of records, found {}", kind_of(&other)),
        }
    }

    fn kind_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

}
