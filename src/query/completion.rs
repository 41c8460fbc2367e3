//! Cursor-aware autocomplete
//!
//! Completion runs in two phases. First the fragment under the cursor is
//! located from the tokens of `query[..cursor]`. Then everything before the
//! fragment is parsed permissively and the grammar's expectation at the end
//! of that prefix picks the candidate set, which is filtered by the fragment.

use super::parser::grammar::{Expectation, ParseFailure, Parser};
use super::parser::lexer::{tokenize, Token, TokenKind};
use super::parser::Operator;
use super::schema::{self, ValueKind, DURATION_PRESETS};
use serde::Serialize;
use tracing::trace;

/// Completions for one cursor position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    /// Byte offset where the fragment begins; a chosen suggestion replaces
    /// `query[fragment_start..cursor]`
    pub fragment_start: usize,
    pub fragment: String,
    pub suggestions: Vec<String>,
}

impl Completion {
    /// Splice a suggestion into the query, returning the new text and cursor.
    ///
    /// `None` when `cursor` is not a char boundary of `query` at or past
    /// `fragment_start`, as happens when the completion came from other text.
    pub fn apply(&self, query: &str, cursor: usize, suggestion: &str) -> Option<(String, usize)> {
        if cursor < self.fragment_start {
            return None;
        }
        let before = query.get(..self.fragment_start)?;
        let after = query.get(cursor..)?;

        let mut text = String::with_capacity(query.len() + suggestion.len() + 1);
        text.push_str(before);
        text.push_str(suggestion);
        text.push(' ');
        let new_cursor = text.len();
        text.push_str(after.trim_start());
        Some((text, new_cursor))
    }
}

/// Autocomplete engine with an optional cap on suggestions
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionEngine {
    max_suggestions: Option<usize>,
}

impl CompletionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_suggestions: usize) -> Self {
        Self {
            max_suggestions: Some(max_suggestions),
        }
    }

    /// Suggestions for the cursor position; empty for an invalid cursor
    pub fn suggest(&self, query: &str, cursor: usize) -> Vec<String> {
        self.complete(query, cursor)
            .map(|completion| completion.suggestions)
            .unwrap_or_default()
    }

    /// Full completion, or `None` when the cursor is past the end or not on
    /// a character boundary
    pub fn complete(&self, query: &str, cursor: usize) -> Option<Completion> {
        let prefix = query.get(..cursor)?;
        Some(self.complete_tokens(prefix, &tokenize(prefix)))
    }

    /// Complete at the end of `prefix`, given its tokens
    pub fn complete_tokens(&self, prefix: &str, tokens: &[Token]) -> Completion {
        let cursor = prefix.len();
        let (fragment_start, consumed) = locate_fragment(tokens, cursor);
        let fragment = &prefix[fragment_start..];

        let candidates = candidates(&tokens[..consumed]);
        let needle = normalize(fragment);
        let matching = candidates
            .into_iter()
            .filter(|candidate| normalize(candidate).starts_with(&needle));

        let suggestions: Vec<String> = match self.max_suggestions {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        };
        trace!(fragment, count = suggestions.len(), "completed");

        Completion {
            fragment_start,
            fragment: fragment.to_string(),
            suggestions,
        }
    }
}

/// Find where the fragment starts and how many tokens precede it
fn locate_fragment(tokens: &[Token], cursor: usize) -> (usize, usize) {
    let is_starts = |token: &Token| {
        token.kind == TokenKind::Unknown && token.text.eq_ignore_ascii_case("starts")
    };

    match tokens.split_last() {
        Some((last, rest)) if last.end == cursor && last.is_word_like() => match rest.last() {
            Some(previous) if is_starts(previous) => (previous.start, rest.len() - 1),
            _ => (last.start, rest.len()),
        },
        // `STARTS ` with the cursor after the space is still mid-operator
        Some((last, rest)) if is_starts(last) => (last.start, rest.len()),
        _ => (cursor, tokens.len()),
    }
}

/// Candidates for the position after `tokens`, in declaration order
fn candidates(tokens: &[Token]) -> Vec<String> {
    match Parser::permissive(tokens).parse() {
        Ok(None) => field_names(),
        Ok(Some(_)) => connectives(false),
        Err(ParseFailure::Incomplete(incomplete)) => match incomplete.expected {
            Expectation::Field => field_names(),
            Expectation::Operator { field } => field
                .kind
                .operators()
                .iter()
                .map(|operator| operator.symbol().to_string())
                .collect(),
            Expectation::Value { field, operator } => value_candidates(field.kind, operator),
            Expectation::Connective => connectives(true),
        },
        Err(ParseFailure::Syntax(error)) => {
            trace!(%error, "no completions after invalid prefix");
            Vec::new()
        }
    }
}

fn field_names() -> Vec<String> {
    schema::fields()
        .iter()
        .map(|field| field.name.to_string())
        .collect()
}

fn connectives(in_group: bool) -> Vec<String> {
    let mut connectives = vec!["AND".to_string(), "OR".to_string()];
    if in_group {
        connectives.push(")".to_string());
    }
    connectives
}

fn value_candidates(kind: ValueKind, operator: Operator) -> Vec<String> {
    if operator == Operator::In || !kind.accepts(operator) {
        return Vec::new();
    }

    let quoted = |value: &&str| format!("\"{value}\"");
    match kind {
        ValueKind::Enum(values) => values.iter().map(quoted).collect(),
        ValueKind::Duration => DURATION_PRESETS.iter().map(quoted).collect(),
        _ => Vec::new(),
    }
}

/// Comparison key: no leading quote, lowercase, single spaces
fn normalize(text: &str) -> String {
    let text = text.trim_start_matches(['"', '\'']);
    let mut normalized = String::with_capacity(text.len());
    let mut in_space = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_space {
                normalized.push(' ');
            }
            in_space = true;
        } else {
            normalized.extend(ch.to_lowercase());
            in_space = false;
        }
    }

    normalized
}

/// Ordered completions for `query` at byte offset `cursor`
pub fn get_autocomplete_suggestions(query: &str, cursor: usize) -> Vec<String> {
    CompletionEngine::new().suggest(query, cursor)
}
