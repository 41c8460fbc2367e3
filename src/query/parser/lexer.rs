//! Lexical analysis (tokenization) for the query language
//!
//! Lexing is total: any character run the lexer does not recognize becomes an
//! [`TokenKind::Unknown`] token and is left for the grammar to reject.

use crate::query::schema;
use serde::Serialize;
use std::fmt;

/// Token classes in the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Field,
    Operator,
    Logical,
    Value,
    Paren,
    Unknown,
}

impl TokenKind {
    /// Lowercase tag used by the rendering layer
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Field => "field",
            TokenKind::Operator => "operator",
            TokenKind::Logical => "logical",
            TokenKind::Value => "value",
            TokenKind::Paren => "paren",
            TokenKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified slice of the query; `start..end` are byte offsets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Whether this token can be a partially typed word under the cursor.
    /// Parentheses and symbolic operators always end a fragment.
    pub fn is_word_like(&self) -> bool {
        match self.kind {
            TokenKind::Paren => false,
            TokenKind::Operator => self.text.starts_with(|c: char| c.is_ascii_alphabetic()),
            _ => true,
        }
    }

    pub fn is_open_paren(&self) -> bool {
        self.kind == TokenKind::Paren && self.text == "("
    }

    pub fn is_close_paren(&self) -> bool {
        self.kind == TokenKind::Paren && self.text == ")"
    }
}

/// Characters allowed in a bare word
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | ':' | '/' | '-' | '*')
}

/// Characters that start a token of their own
fn starts_token(ch: char) -> bool {
    is_word_char(ch) || matches!(ch, '"' | '\'' | '[' | '(' | ')' | '=' | '!' | '<' | '>')
}

/// Lexical analyzer for the query language
pub struct Lexer<'a> {
    source: &'a str,
    input: Vec<(usize, char)>,
    current: usize,
    previous: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given input
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.char_indices().collect(),
            current: 0,
            previous: None,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }

            let token = self.next_token();
            self.previous = Some(token.kind);
            tokens.push(token);
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        let start = self.offset();
        let ch = self.advance();

        let kind = match ch {
            '(' | ')' => TokenKind::Paren,
            '=' => TokenKind::Operator,
            '!' if self.peek() == Some('=') => {
                self.advance();
                TokenKind::Operator
            }
            '!' => TokenKind::Unknown,
            '>' | '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                }
                TokenKind::Operator
            }
            '"' | '\'' => {
                self.string(ch);
                TokenKind::Value
            }
            '[' => {
                self.list();
                TokenKind::Value
            }
            ch if is_word_char(ch) => {
                self.word();
                self.classify_word(start)
            }
            _ => {
                self.unknown_run();
                TokenKind::Unknown
            }
        };

        self.make_token(kind, start)
    }

    /// Consume a quoted literal; an unterminated string runs to the end
    fn string(&mut self, quote: char) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\\' {
                if !self.is_at_end() {
                    self.advance();
                }
            } else if ch == quote {
                return;
            }
        }
    }

    /// Consume a bracketed list, skipping over quoted elements
    fn list(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            match ch {
                '"' | '\'' => self.string(ch),
                ']' => return,
                _ => {}
            }
        }
    }

    fn word(&mut self) {
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }
    }

    fn classify_word(&mut self, start: usize) -> TokenKind {
        let text = &self.source[start..self.offset()];

        if text.eq_ignore_ascii_case("and") || text.eq_ignore_ascii_case("or") {
            return TokenKind::Logical;
        }
        if self.previous == Some(TokenKind::Operator) {
            return TokenKind::Value;
        }
        if schema::lookup(text).is_some() {
            return TokenKind::Field;
        }
        if text.eq_ignore_ascii_case("contains") || text.eq_ignore_ascii_case("in") {
            return TokenKind::Operator;
        }
        if text.eq_ignore_ascii_case("starts") && self.followed_by_with() {
            return TokenKind::Operator;
        }
        if text.starts_with(|c: char| c.is_ascii_digit()) {
            return TokenKind::Value;
        }
        TokenKind::Unknown
    }

    /// Look past whitespace for a standalone `WITH`; consume it on success
    fn followed_by_with(&mut self) -> bool {
        let mut index = self.current;
        let gap_start = index;
        while index < self.input.len() && self.input[index].1.is_whitespace() {
            index += 1;
        }
        if index == gap_start {
            return false;
        }

        let mut end = index;
        while end < self.input.len() && is_word_char(self.input[end].1) {
            end += 1;
        }
        let word_start = self.byte_at(index);
        let word_end = self.byte_at(end);

        if self.source[word_start..word_end].eq_ignore_ascii_case("with") {
            self.current = end;
            true
        } else {
            false
        }
    }

    fn unknown_run(&mut self) {
        while self
            .peek()
            .is_some_and(|ch| !ch.is_whitespace() && !starts_token(ch))
        {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        let end = self.offset();
        Token {
            kind,
            text: self.source[start..end].to_string(),
            start,
            end,
        }
    }

    /// Byte offset of the next unread character
    fn offset(&self) -> usize {
        self.byte_at(self.current)
    }

    fn byte_at(&self, index: usize) -> usize {
        self.input
            .get(index)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.source.len())
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.input.len()
    }

    fn advance(&mut self) -> char {
        let ch = self.input[self.current].1;
        self.current += 1;
        ch
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).map(|(_, ch)| *ch)
    }
}

/// Tokenize a query. Never fails.
pub fn tokenize(query: &str) -> Vec<Token> {
    Lexer::new(query).tokenize()
}
