//! # jql-engine
//!
//! Query language engine for a security dashboard's device filter bar.
//!
//! Queries are comparisons over a fixed schema of device fields, joined with
//! `AND`/`OR` and grouped with parentheses:
//!
//! ```text
//! os CONTAINS "Windows" AND (risk_level = "HIGH" OR open_ports > 20)
//! ```
//!
//! The engine is a set of pure functions. It tokenizes, validates, suggests
//! completions at a cursor and classifies tokens for highlighting. On top of
//! that the crate evaluates queries against JSON records and ships a CLI
//! with an interactive console.
//!
//! ## Quick Start
//!
//! ```rust
//! use jql_engine::{get_autocomplete_suggestions, validate_jql_syntax};
//!
//! let result = validate_jql_syntax("risk_level = \"HIGH\" AND ip = \"10.0.0.0/8\"");
//! assert!(result.valid);
//!
//! let suggestions = get_autocomplete_suggestions("risk_level = ", 13);
//! assert_eq!(suggestions[0], "\"LOW\"");
//! ```
//!
//! ## Module Overview
//!
//! - [`query`] - Lexer, parser, completion, highlighting and evaluation
//! - [`history`] - Query history and saved queries over a storage port
//! - [`config`] - Configuration loading and validation
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types

/// Command-line interface and argument parsing
pub mod cli;
/// Configuration management and validation
pub mod config;
/// Error types and handling utilities
pub mod error;
/// Query history and saved queries
pub mod history;
/// The query language engine
pub mod query;

pub use config::JqlConfig;
pub use error::{JqlError, JqlResult};
pub use query::{
    filter_records, get_autocomplete_suggestions, get_syntax_tokens, tokenize,
    validate_jql_syntax, Evaluator, QueryEngine, SyntaxToken, Token, TokenKind, ValidationResult,
    SUPPORTED_FIELDS,
};
