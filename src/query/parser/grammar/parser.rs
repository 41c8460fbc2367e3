//! Main parsing engine implementation
//!
//! ```text
//! expr       := term (LOGICAL term)*
//! term       := LPAREN expr RPAREN | comparison
//! comparison := FIELD OPERATOR value
//! ```
//!
//! Connectives share one precedence level and associate to the left.

use super::types::{
    Expectation, Incomplete, ParseFailure, ParseMode, ParseResult, ParsedQuery, ParserState,
};
use super::super::ast::{Comparison, Expr, FieldValue, LogicalOp, Operator};
use super::super::errors::SyntaxError;
use super::super::lexer::{Token, TokenKind};
use super::super::values;
use crate::query::schema;
use tracing::trace;

/// Deepest parenthesis nesting accepted before parsing stops
pub const MAX_NESTING: usize = 64;

/// Recursive descent parser for filter expressions
pub struct Parser<'t> {
    state: ParserState<'t>,
    mode: ParseMode,
    open_parens: Vec<usize>,
}

impl<'t> Parser<'t> {
    /// Create a strict parser over the given tokens
    pub fn new(tokens: &'t [Token]) -> Self {
        Self::with_mode(tokens, ParseMode::Strict)
    }

    /// Create a parser that tolerates schema mismatches
    pub fn permissive(tokens: &'t [Token]) -> Self {
        Self::with_mode(tokens, ParseMode::Permissive)
    }

    pub fn with_mode(tokens: &'t [Token], mode: ParseMode) -> Self {
        Self {
            state: ParserState::new(tokens),
            mode,
            open_parens: Vec::new(),
        }
    }

    /// Parse every token into one expression; `None` for an empty stream
    pub fn parse(&mut self) -> ParsedQuery {
        if self.state.is_at_end() {
            return Ok(None);
        }

        let expr = self.parse_expression()?;
        match self.state.peek() {
            None => Ok(Some(expr)),
            Some(token) => Err(self.trailing_error(token).into()),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_term()?;

        while let Some(token) = self.state.match_kind(TokenKind::Logical) {
            let op = LogicalOp::from_lexeme(&token.text).ok_or_else(|| {
                SyntaxError::ExpectedField {
                    found: token.text.clone(),
                    position: token.start,
                }
            })?;
            let right = self.parse_term()?;
            left = Expr::Logical {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let Some(token) = self.state.peek() else {
            return Err(self.incomplete(Expectation::Field));
        };

        match token.kind {
            TokenKind::Paren if token.is_open_paren() => self.parse_group(),
            TokenKind::Paren => Err(self.misplaced_close(token).into()),
            TokenKind::Field => self.parse_comparison(),
            TokenKind::Unknown if token.text.starts_with(|c: char| c.is_alphabetic() || c == '_') => {
                Err(SyntaxError::UnknownField {
                    field: token.text.clone(),
                    position: token.start,
                }
                .into())
            }
            TokenKind::Logical => match self.state.previous() {
                Some(previous) if previous.kind == TokenKind::Logical => {
                    Err(SyntaxError::ExpectedExpressionAfter {
                        connective: previous.text.to_ascii_uppercase(),
                        position: previous.start,
                    }
                    .into())
                }
                _ => Err(self.unexpected_field(token).into()),
            },
            _ => Err(self.unexpected_field(token).into()),
        }
    }

    fn parse_group(&mut self) -> ParseResult<Expr> {
        let Some(open) = self.state.advance() else {
            return Err(self.incomplete(Expectation::Field));
        };
        if self.open_parens.len() >= MAX_NESTING {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING,
                position: open.start,
            }
            .into());
        }
        self.open_parens.push(open.start);

        let inner = self.parse_expression()?;
        match self.state.peek() {
            None => Err(self.incomplete(Expectation::Connective)),
            Some(token) if token.is_close_paren() => {
                self.state.advance();
                self.open_parens.pop();
                Ok(Expr::Group(Box::new(inner)))
            }
            Some(token) => Err(self.trailing_error(token).into()),
        }
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let Some(field_token) = self.state.advance() else {
            return Err(self.incomplete(Expectation::Field));
        };
        let field = schema::lookup(&field_token.text).ok_or_else(|| SyntaxError::UnknownField {
            field: field_token.text.clone(),
            position: field_token.start,
        })?;

        let operator_token = match self.state.peek() {
            None => return Err(self.incomplete(Expectation::Operator { field })),
            Some(token) if token.kind == TokenKind::Operator => token,
            Some(token) => {
                return Err(SyntaxError::ExpectedOperator {
                    field: field.name.to_string(),
                    found: token.text.clone(),
                    position: token.start,
                }
                .into())
            }
        };
        self.state.advance();

        let operator = Operator::from_lexeme(&operator_token.text).ok_or_else(|| {
            SyntaxError::ExpectedOperator {
                field: field.name.to_string(),
                found: operator_token.text.clone(),
                position: operator_token.start,
            }
        })?;

        if !field.kind.accepts(operator) && self.mode == ParseMode::Strict {
            return Err(SyntaxError::IncompatibleOperator {
                operator: operator.to_string(),
                kind: field.kind.to_string(),
                field: field.name.to_string(),
                position: operator_token.start,
            }
            .into());
        }

        let value_token = match self.state.peek() {
            None => return Err(self.incomplete(Expectation::Value { field, operator })),
            Some(token) if token.kind == TokenKind::Value => token,
            Some(token) => {
                return Err(SyntaxError::ExpectedValue {
                    operator: operator.to_string(),
                    found: token.text.clone(),
                    position: token.start,
                }
                .into())
            }
        };
        self.state.advance();

        let value = match values::coerce(field, operator, value_token) {
            Ok(value) => value,
            Err(error) if self.mode == ParseMode::Permissive && error.is_schema_mismatch() => {
                trace!(%error, "tolerating value mismatch");
                FieldValue::Text(value_token.text.clone())
            }
            Err(error) => return Err(error.into()),
        };

        Ok(Expr::Comparison(Comparison {
            field,
            operator,
            value,
            position: field_token.start,
        }))
    }

    /// Error for a token left over after a complete expression
    fn trailing_error(&self, token: &Token) -> SyntaxError {
        if token.is_close_paren() {
            SyntaxError::UnmatchedParen {
                position: token.start,
            }
        } else {
            SyntaxError::MissingConnective {
                found: token.text.clone(),
                position: token.start,
            }
        }
    }

    /// Error for `)` where an expression should start
    fn misplaced_close(&self, token: &Token) -> SyntaxError {
        match self.state.previous() {
            Some(previous) if previous.is_open_paren() => SyntaxError::EmptyGroup {
                position: previous.start,
            },
            Some(previous) if previous.kind == TokenKind::Logical => {
                SyntaxError::ExpectedExpressionAfter {
                    connective: previous.text.to_ascii_uppercase(),
                    position: previous.start,
                }
            }
            _ => SyntaxError::UnmatchedParen {
                position: token.start,
            },
        }
    }

    fn unexpected_field(&self, token: &Token) -> SyntaxError {
        SyntaxError::ExpectedField {
            found: token.text.clone(),
            position: token.start,
        }
    }

    fn incomplete(&self, expected: Expectation) -> ParseFailure {
        ParseFailure::Incomplete(Incomplete {
            expected,
            last: self.state.previous().cloned(),
            open_parens: self.open_parens.clone(),
        })
    }
}
