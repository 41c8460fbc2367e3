//! Grammar-related types and structures

use super::super::ast::{Expr, Operator};
use super::super::errors::{SyntaxError, END_OF_INPUT};
use super::super::lexer::{Token, TokenKind};
use crate::query::schema::FieldSpec;

/// Parser state for tracking position in a borrowed token slice
#[derive(Debug, Clone)]
pub struct ParserState<'t> {
    pub tokens: &'t [Token],
    pub current: usize,
}

impl<'t> ParserState<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, current: 0 }
    }

    pub fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// Get the current token without advancing
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.current)
    }

    /// Get the most recently consumed token
    pub fn previous(&self) -> Option<&'t Token> {
        self.current
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    /// Advance to the next token and return the one consumed
    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.current)?;
        self.current += 1;
        Some(token)
    }

    /// Check if the current token is of the given kind
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    /// Consume the current token if it is of the given kind
    pub fn match_kind(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.check(kind) {
            self.advance()
        } else {
            None
        }
    }
}

/// How schema mismatches are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Every problem is an error
    #[default]
    Strict,
    /// Incompatible operators and malformed values are tolerated; used to
    /// find the grammatical position of a partial query
    Permissive,
}

/// What the grammar required when the tokens ran out
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// Start of input, after a connective or after `(`
    Field,
    Operator { field: &'static FieldSpec },
    Value {
        field: &'static FieldSpec,
        operator: Operator,
    },
    /// A complete expression inside at least one open group
    Connective,
}

/// A partial query that ended where more input was required
#[derive(Debug, Clone, PartialEq)]
pub struct Incomplete {
    pub expected: Expectation,
    /// Last token consumed before the end
    pub last: Option<Token>,
    /// Byte offsets of the `(` still open, outermost first
    pub open_parens: Vec<usize>,
}

impl Incomplete {
    /// The error strict validation reports for this early end
    pub fn into_error(self) -> SyntaxError {
        let at_end = self.last.as_ref().map(|token| token.end).unwrap_or(0);

        match self.expected {
            Expectation::Field => match self.last {
                Some(token) if token.kind == TokenKind::Logical => {
                    SyntaxError::ExpectedExpressionAfter {
                        connective: token.text.to_ascii_uppercase(),
                        position: token.start,
                    }
                }
                Some(token) if token.is_open_paren() => SyntaxError::UnclosedParen {
                    position: token.start,
                },
                _ => SyntaxError::ExpectedField {
                    found: END_OF_INPUT.to_string(),
                    position: at_end,
                },
            },
            Expectation::Operator { field } => SyntaxError::ExpectedOperator {
                field: field.name.to_string(),
                found: END_OF_INPUT.to_string(),
                position: at_end,
            },
            Expectation::Value { operator, .. } => SyntaxError::ExpectedValue {
                operator: operator.to_string(),
                found: END_OF_INPUT.to_string(),
                position: at_end,
            },
            Expectation::Connective => SyntaxError::UnclosedParen {
                position: self.open_parens.last().copied().unwrap_or(at_end),
            },
        }
    }
}

/// Why a parse did not produce an expression
#[derive(Debug, Clone, PartialEq)]
pub enum ParseFailure {
    Syntax(SyntaxError),
    Incomplete(Incomplete),
}

impl ParseFailure {
    pub fn into_error(self) -> SyntaxError {
        match self {
            ParseFailure::Syntax(error) => error,
            ParseFailure::Incomplete(incomplete) => incomplete.into_error(),
        }
    }
}

impl From<SyntaxError> for ParseFailure {
    fn from(error: SyntaxError) -> Self {
        ParseFailure::Syntax(error)
    }
}

/// Parse result wrapper
pub type ParseResult<T> = Result<T, ParseFailure>;

/// Outcome of parsing a whole token slice
pub type ParsedQuery = ParseResult<Option<Expr>>;
