//! JQL filter-expression parser
//!
//! A query is a boolean combination of `field OPERATOR value` comparisons
//! over the static field schema:
//!
//! ```text
//! os CONTAINS "Windows" AND risk_level = "HIGH"
//! (status = online OR status = isolated) AND open_ports > 20
//! device_type IN ["server", "workstation"] AND last_activity < "7d"
//! hostname STARTS WITH "web-" OR ip = "10.0.0.0/8"
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use jql_engine::query::parser::{parse, validate_jql_syntax};
//!
//! let result = validate_jql_syntax("os CONTAINS \"Windows\" AND risk_level = \"HIGH\"");
//! assert!(result.valid);
//!
//! let expr = parse("open_ports > 20")?.expect("non-empty query");
//! assert_eq!(expr.comparisons().len(), 1);
//! # Ok::<(), jql_engine::query::parser::SyntaxError>(())
//! ```

pub mod ast;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod values;

pub use ast::{Comparison, DurationValue, Expr, FieldValue, IpMatcher, LogicalOp, Operator};
pub use errors::{SyntaxError, ValidationResult};
pub use grammar::{Expectation, Incomplete, ParseFailure, ParseMode, Parser, MAX_NESTING};
pub use lexer::{tokenize, Lexer, Token, TokenKind};

use tracing::debug;

/// Parse a query into its expression tree; `Ok(None)` when the query is
/// empty or whitespace-only
pub fn parse(query: &str) -> Result<Option<Expr>, SyntaxError> {
    let tokens = tokenize(query);
    parse_tokens(&tokens)
}

/// Parse an already tokenized query in strict mode
pub fn parse_tokens(tokens: &[Token]) -> Result<Option<Expr>, SyntaxError> {
    Parser::new(tokens).parse().map_err(|failure| {
        let error = failure.into_error();
        debug!(position = error.position(), %error, "query rejected");
        error
    })
}

/// Validate a query, reporting the first error as data
pub fn validate_jql_syntax(query: &str) -> ValidationResult {
    parse(query).map(|_| ()).into()
}
