//! Crate-level error types
//!
//! Query text problems are never errors here: they are reported as
//! [`SyntaxError`](crate::query::SyntaxError) data. These enums cover the
//! application shell around the engine.

use crate::query::SyntaxError;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence port failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load '{key}': {reason}")]
    LoadFailed { key: String, reason: String },

    #[error("Failed to save '{key}': {reason}")]
    SaveFailed { key: String, reason: String },

    #[error("Stored value for '{key}' is corrupt")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Query history and saved-query errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Saved query name cannot be empty")]
    EmptyName,

    #[error("Refusing to save invalid query '{query}': {source}")]
    InvalidQuery {
        query: String,
        #[source]
        source: SyntaxError,
    },

    #[error("No saved query named '{name}'")]
    NotFound { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },
}

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum JqlError {
    #[error("Query is invalid")]
    Syntax(#[from] SyntaxError),

    #[error("Query store operation failed")]
    Store(#[from] StoreError),

    #[error("Query history operation failed")]
    History(#[from] HistoryError),

    #[error("Configuration error")]
    Config(#[from] ConfigError),

    #[error("IO error during {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl JqlError {
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}

pub type JqlResult<T> = Result<T, JqlError>;
