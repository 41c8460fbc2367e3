//! Syntax errors and validation results

use crate::query::schema::SUPPORTED_FIELDS;
use serde::Serialize;
use thiserror::Error;

/// Placeholder for `found` when the query ends early
pub const END_OF_INPUT: &str = "end of input";

/// A grammar or schema error with the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("Unknown field '{field}'. Supported fields: {}", SUPPORTED_FIELDS.join(", "))]
    UnknownField { field: String, position: usize },

    #[error("Operator '{operator}' cannot be used with {kind} field '{field}'")]
    IncompatibleOperator {
        operator: String,
        kind: String,
        field: String,
        position: usize,
    },

    #[error("Invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidValue {
        value: String,
        field: String,
        expected: String,
        position: usize,
    },

    #[error("Operator IN on field '{field}' requires a list such as [\"a\", \"b\"]")]
    ListRequired { field: String, position: usize },

    #[error("A list value can only be used with IN, not '{operator}'")]
    ListNotAllowed { operator: String, position: usize },

    #[error("List value cannot be empty")]
    EmptyList { position: usize },

    #[error("Malformed list value: {reason}")]
    MalformedList { reason: String, position: usize },

    #[error("Unterminated string literal")]
    UnterminatedString { position: usize },

    #[error("Unterminated list, expected ']'")]
    UnterminatedList { position: usize },

    #[error("Unclosed parenthesis")]
    UnclosedParen { position: usize },

    #[error("Unmatched closing parenthesis")]
    UnmatchedParen { position: usize },

    #[error("Expected expression inside parentheses")]
    EmptyGroup { position: usize },

    #[error("Parentheses nested more than {limit} deep")]
    NestingTooDeep { limit: usize, position: usize },

    #[error("Expected expression after {connective}")]
    ExpectedExpressionAfter { connective: String, position: usize },

    #[error("Expected AND/OR before '{found}'")]
    MissingConnective { found: String, position: usize },

    #[error("Expected field name, found '{found}'")]
    ExpectedField { found: String, position: usize },

    #[error("Expected operator after field '{field}', found '{found}'")]
    ExpectedOperator {
        field: String,
        found: String,
        position: usize,
    },

    #[error("Expected value after '{operator}', found '{found}'")]
    ExpectedValue {
        operator: String,
        found: String,
        position: usize,
    },
}

impl SyntaxError {
    /// Byte offset into the query where the error was detected
    pub fn position(&self) -> usize {
        match self {
            SyntaxError::UnknownField { position, .. }
            | SyntaxError::IncompatibleOperator { position, .. }
            | SyntaxError::InvalidValue { position, .. }
            | SyntaxError::ListRequired { position, .. }
            | SyntaxError::ListNotAllowed { position, .. }
            | SyntaxError::EmptyList { position }
            | SyntaxError::MalformedList { position, .. }
            | SyntaxError::UnterminatedString { position }
            | SyntaxError::UnterminatedList { position }
            | SyntaxError::UnclosedParen { position }
            | SyntaxError::UnmatchedParen { position }
            | SyntaxError::EmptyGroup { position }
            | SyntaxError::NestingTooDeep { position, .. }
            | SyntaxError::ExpectedExpressionAfter { position, .. }
            | SyntaxError::MissingConnective { position, .. }
            | SyntaxError::ExpectedField { position, .. }
            | SyntaxError::ExpectedOperator { position, .. }
            | SyntaxError::ExpectedValue { position, .. } => *position,
        }
    }

    /// Whether the error is a schema mismatch rather than a structural one.
    /// Permissive parsing skips over these.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(
            self,
            SyntaxError::IncompatibleOperator { .. }
                | SyntaxError::InvalidValue { .. }
                | SyntaxError::ListRequired { .. }
                | SyntaxError::ListNotAllowed { .. }
                | SyntaxError::EmptyList { .. }
                | SyntaxError::MalformedList { .. }
        )
    }
}

/// Outcome of validating a query, shaped for the UI boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_position: Option<usize>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            error_position: None,
        }
    }

    pub fn from_error(error: &SyntaxError) -> Self {
        Self {
            valid: false,
            error: Some(error.to_string()),
            error_position: Some(error.position()),
        }
    }
}

impl From<Result<(), SyntaxError>> for ValidationResult {
    fn from(result: Result<(), SyntaxError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(error) => Self::from_error(&error),
        }
    }
}
