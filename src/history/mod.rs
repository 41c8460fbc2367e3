//! Query history and saved queries
//!
//! Both collections are serialized as JSON under fixed keys of an injected
//! [`QueryStore`].

pub mod storage;

pub use storage::{MemoryStore, QueryStore};

use crate::error::{HistoryError, StoreError};
use crate::query::parser;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub const HISTORY_KEY: &str = "jql.history";
pub const SAVED_QUERIES_KEY: &str = "jql.saved_queries";

fn load_json<T: DeserializeOwned + Default>(
    store: &dyn QueryStore,
    key: &str,
) -> Result<T, StoreError> {
    match store.load(key)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        }),
        None => Ok(T::default()),
    }
}

fn save_json<T: Serialize>(store: &dyn QueryStore, key: &str, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::SaveFailed {
        key: key.to_string(),
        reason: source.to_string(),
    })?;
    store.save(key, &raw)
}

/// Recently submitted queries, most recent first, without duplicates
pub struct QueryHistory {
    store: Arc<dyn QueryStore>,
    capacity: usize,
}

impl QueryHistory {
    pub fn new(store: Arc<dyn QueryStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    pub fn entries(&self) -> Result<Vec<String>, HistoryError> {
        Ok(load_json(self.store.as_ref(), HISTORY_KEY)?)
    }

    /// Move `query` to the front, dropping the oldest entries past capacity
    pub fn record(&self, query: &str) -> Result<(), HistoryError> {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return Ok(());
        }

        let mut entries = self.entries()?;
        entries.retain(|entry| entry != query);
        entries.insert(0, query.to_string());
        entries.truncate(self.capacity);

        debug!(entries = entries.len(), "recorded query in history");
        Ok(save_json(self.store.as_ref(), HISTORY_KEY, &entries)?)
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        Ok(save_json(self.store.as_ref(), HISTORY_KEY, &Vec::<String>::new())?)
    }
}

/// A named query kept for reuse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: Uuid,
    pub name: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

/// Named queries; only valid queries are accepted
pub struct SavedQueries {
    store: Arc<dyn QueryStore>,
}

impl SavedQueries {
    pub fn new(store: Arc<dyn QueryStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<SavedQuery>, HistoryError> {
        Ok(load_json(self.store.as_ref(), SAVED_QUERIES_KEY)?)
    }

    /// Save or replace the query stored under `name`
    pub fn save(&self, name: &str, query: &str) -> Result<SavedQuery, HistoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HistoryError::EmptyName);
        }
        let query = query.trim();
        parser::parse(query).map_err(|source| HistoryError::InvalidQuery {
            query: query.to_string(),
            source,
        })?;

        let saved = SavedQuery {
            id: Uuid::new_v4(),
            name: name.to_string(),
            query: query.to_string(),
            created_at: Utc::now(),
        };

        let mut queries = self.list()?;
        queries.retain(|existing| existing.name != saved.name);
        queries.push(saved.clone());
        save_json(self.store.as_ref(), SAVED_QUERIES_KEY, &queries)?;

        debug!(name = %saved.name, id = %saved.id, "saved query");
        Ok(saved)
    }

    pub fn get(&self, name: &str) -> Result<SavedQuery, HistoryError> {
        self.list()?
            .into_iter()
            .find(|saved| saved.name == name)
            .ok_or_else(|| HistoryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Remove a saved query; `false` when no query had that name
    pub fn remove(&self, name: &str) -> Result<bool, HistoryError> {
        let mut queries = self.list()?;
        let before = queries.len();
        queries.retain(|saved| saved.name != name);
        if queries.len() == before {
            return Ok(false);
        }

        save_json(self.store.as_ref(), SAVED_QUERIES_KEY, &queries)?;
        Ok(true)
    }
}
