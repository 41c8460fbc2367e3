//! JQL query engine
//!
//! The engine is a set of pure functions over the static field schema:
//! tokenize, validate, complete and classify. [`QueryEngine`] bundles them
//! with the configured suggestion limit and an optional token cache.

pub mod cache;
pub mod completion;
pub mod executor;
pub mod highlight;
pub mod parser;
pub mod repl;
pub mod schema;

pub use cache::{CacheStats, TokenCache};
pub use completion::{get_autocomplete_suggestions, Completion, CompletionEngine};
pub use executor::{filter_records, Evaluator};
pub use highlight::{classify, get_syntax_tokens, render_ansi, Highlighter, SyntaxToken};
pub use parser::{
    parse, tokenize, validate_jql_syntax, Expr, SyntaxError, Token, TokenKind, ValidationResult,
};
pub use repl::InteractiveRepl;
pub use schema::{FieldSpec, ValueKind, FIELD_SCHEMA, SUPPORTED_FIELDS};

use crate::config::JqlConfig;
use std::sync::Arc;

/// Engine facade carrying configuration
pub struct QueryEngine {
    completion: CompletionEngine,
    cache: Option<TokenCache>,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    /// Unlimited suggestions with a default-sized token cache
    pub fn new() -> Self {
        Self {
            completion: CompletionEngine::new(),
            cache: Some(TokenCache::default()),
        }
    }

    pub fn from_config(config: &JqlConfig) -> Self {
        let completion = match config.completion.max_suggestions {
            0 => CompletionEngine::new(),
            limit => CompletionEngine::with_limit(limit),
        };
        let cache = config
            .cache
            .enabled
            .then(|| TokenCache::new(config.cache.max_entries));

        Self { completion, cache }
    }

    pub fn tokenize(&self, query: &str) -> Arc<Vec<Token>> {
        match &self.cache {
            Some(cache) => cache.tokens(query),
            None => Arc::new(tokenize(query)),
        }
    }

    pub fn validate(&self, query: &str) -> ValidationResult {
        self.parse(query).map(|_| ()).into()
    }

    pub fn parse(&self, query: &str) -> Result<Option<Expr>, SyntaxError> {
        parser::parse_tokens(&self.tokenize(query))
    }

    pub fn suggest(&self, query: &str, cursor: usize) -> Vec<String> {
        self.complete(query, cursor)
            .map(|completion| completion.suggestions)
            .unwrap_or_default()
    }

    pub fn complete(&self, query: &str, cursor: usize) -> Option<Completion> {
        let prefix = query.get(..cursor)?;
        Some(self.completion.complete_tokens(prefix, &self.tokenize(prefix)))
    }

    pub fn syntax_tokens(&self, query: &str) -> Vec<SyntaxToken> {
        self.tokenize(query)
            .iter()
            .cloned()
            .map(SyntaxToken::from)
            .collect()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(TokenCache::stats)
    }
}
