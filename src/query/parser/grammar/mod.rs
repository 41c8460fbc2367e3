//! Grammar module for the query parser
//!
//! One recursive-descent core serves both validation and completion. In
//! strict mode every problem is an error; in permissive mode schema
//! mismatches are skipped so a partial query still reveals what the grammar
//! expects next.

pub mod parser;
pub mod types;

pub use parser::{Parser, MAX_NESTING};
pub use types::{
    Expectation, Incomplete, ParseFailure, ParseMode, ParseResult, ParsedQuery, ParserState,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::lexer::{tokenize, TokenKind};

    #[test]
    fn test_parser_state_management() {
        let tokens = tokenize("os = \"Windows\"");
        let mut state = ParserState::new(&tokens);

        assert!(!state.is_at_end());
        assert!(state.previous().is_none());
        assert!(state.check(TokenKind::Field));

        state.advance();
        assert!(state.match_kind(TokenKind::Operator).is_some());
        assert!(state.match_kind(TokenKind::Operator).is_none());
        assert_eq!(state.advance().map(|token| token.text.as_str()), Some("\"Windows\""));

        assert!(state.is_at_end());
        assert!(state.advance().is_none());
        assert_eq!(state.previous().map(|token| token.kind), Some(TokenKind::Value));
    }

    #[test]
    fn test_modes_share_structure() {
        let queries = ["os = a b", "(os = a", "os = a )", "()"];

        for query in &queries {
            let tokens = tokenize(query);
            let strict = Parser::new(&tokens).parse().map_err(ParseFailure::into_error);
            let permissive = Parser::permissive(&tokens)
                .parse()
                .map_err(ParseFailure::into_error);
            assert_eq!(strict, permissive, "modes disagree on {query}");
        }
    }
}
