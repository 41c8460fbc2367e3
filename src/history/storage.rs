//! Key-value persistence port for session state
//!
//! The engine never touches storage. The REPL owns history and saved
//! queries and reaches storage only through [`QueryStore`].

use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Minimal key-value store
#[cfg_attr(test, mockall::automock)]
pub trait QueryStore: Send + Sync {
    /// Load the value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store; contents are lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::LoadFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::SaveFailed {
            key: key.to_string(),
            reason: "store lock poisoned".to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();

        assert_eq!(store.load("jql.history").unwrap(), None);
        store.save("jql.history", "[]").unwrap();
        store.save("jql.history", "[\"os = a\"]").unwrap();
        assert_eq!(
            store.load("jql.history").unwrap().as_deref(),
            Some("[\"os = a\"]")
        );
    }
}
