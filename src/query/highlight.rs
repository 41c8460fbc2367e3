//! Syntax highlighting over the lexer's token stream
//!
//! The highlighter never classifies text on its own: it renders exactly the
//! tokens the validator sees, so colors and validation cannot disagree.

use super::parser::lexer::{tokenize, Token, TokenKind};
use colored::{ColoredString, Colorize};
use serde::Serialize;

/// Rendering-layer view of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxToken {
    #[serde(rename = "type")]
    pub token_type: TokenKind,
    pub value: String,
}

impl From<Token> for SyntaxToken {
    fn from(token: Token) -> Self {
        Self {
            token_type: token.kind,
            value: token.text,
        }
    }
}

/// The lexer's tokens, unchanged
pub fn classify(query: &str) -> Vec<Token> {
    tokenize(query)
}

/// `{ type, value }` pairs in query order
pub fn get_syntax_tokens(query: &str) -> Vec<SyntaxToken> {
    classify(query).into_iter().map(SyntaxToken::from).collect()
}

/// ANSI renderer for the CLI and REPL
#[derive(Debug, Clone, Copy)]
pub struct Highlighter {
    color: bool,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Highlighter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render the query with whitespace preserved; without color the output
    /// is the input unchanged
    pub fn render(&self, query: &str) -> String {
        self.render_tokens(query, &classify(query))
    }

    pub fn render_tokens(&self, query: &str, tokens: &[Token]) -> String {
        let mut rendered = String::with_capacity(query.len() * 2);
        let mut last = 0;

        for token in tokens {
            rendered.push_str(&query[last..token.start]);
            if self.color {
                rendered.push_str(&paint(token).to_string());
            } else {
                rendered.push_str(&token.text);
            }
            last = token.end;
        }
        rendered.push_str(&query[last..]);

        rendered
    }
}

fn paint(token: &Token) -> ColoredString {
    let text = token.text.as_str();
    match token.kind {
        TokenKind::Field => text.cyan().bold(),
        TokenKind::Operator => text.yellow(),
        TokenKind::Logical => text.magenta().bold(),
        TokenKind::Value => text.green(),
        TokenKind::Paren => text.white().bold(),
        TokenKind::Unknown => text.red().underline(),
    }
}

/// Render with the default color setting
pub fn render_ansi(query: &str) -> String {
    Highlighter::default().render(query)
}
