use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use thiserror::Error;

/// Errors produced by key-value store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Requested key does not exist.
    #[error("entry not found for key: {key}")]
    NotFound { key: String },
    /// Underlying storage failure.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
    /// Value could not be encoded or decoded.
    #[error("serialization failure: {reason}")]
    Serialization { reason: String },
}

/// Synchronous string key-value store holding the persisted slots.
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the raw value for a key.
    fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Persist a value under a key, overwriting any existing entry.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key and its value (idempotent).
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-memory store for tests and ephemeral sessions. Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        let map = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;

        map.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|err| StoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })?;
        map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let store = InMemoryStore::new();
        store.set("tasks", "[]").expect("set should succeed");
        assert_eq!(store.get("tasks").expect("get"), "[]");

        store.set("tasks", "[1]").expect("overwrite");
        assert_eq!(store.get("tasks").expect("get"), "[1]");
    }

    #[test]
    fn clones_share_entries() {
        let store = InMemoryStore::new();
        let other = store.clone();
        store.set("theme", "\"dark\"").expect("set");
        assert_eq!(other.get("theme").expect("get"), "\"dark\"");
    }

    #[test]
    fn remove_is_idempotent_and_removes_data() {
        let store = InMemoryStore::new();
        store.set("k", "v").expect("set should succeed");
        store.remove("k").expect("remove should succeed");
        store.remove("k").expect("remove again should still succeed");

        let err = store.get("k").expect_err("get should fail after remove");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
