//! Memoization of tokenization results
//!
//! Entries are keyed by the exact query string, so a cached token stream is
//! always identical to a fresh `tokenize` of the same input.

use super::parser::lexer::{tokenize, Token};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded, thread-safe token cache
pub struct TokenCache {
    entries: DashMap<String, Arc<Vec<Token>>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(256)
    }
}

impl TokenCache {
    /// A cache that holds at most `max_entries` queries; zero disables it
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Tokens for `query`, computed at most once while cached
    pub fn tokens(&self, query: &str) -> Arc<Vec<Token>> {
        if let Some(cached) = self.entries.get(query) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(cached.value());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let tokens = Arc::new(tokenize(query));
        if self.max_entries == 0 {
            return tokens;
        }

        if self.entries.len() >= self.max_entries {
            debug!(entries = self.entries.len(), "token cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(query.to_string(), Arc::clone(&tokens));

        tokens
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
