use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError};

/// Typed view over a `KeyValueStore`: JSON-encoded values in named slots.
///
/// Reads never fail: a missing, unreadable or corrupt slot yields the caller's
/// default. Writes are best effort; failures are logged and dropped so the
/// in-memory value stays authoritative for the session.
#[derive(Debug, Clone)]
pub struct SlotStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SlotStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying raw store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Read and decode `key`, falling back to `default` on any failure.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.get(key) {
            Ok(raw) => raw,
            Err(StoreError::NotFound { .. }) => {
                debug!(key, "slot empty, using default");
                return default;
            }
            Err(err) => {
                warn!(key, "failed to read slot, using default: {err}");
                return default;
            }
        };

        if raw.trim().is_empty() {
            debug!(key, "slot blank, using default");
            return default;
        }

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, "slot contents unreadable, using default: {err}");
                default
            }
        }
    }

    /// Encode and write `value` to `key`, logging and swallowing failures.
    pub fn store<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_store(key, value) {
            warn!(key, "failed to persist slot: {err}");
        }
    }

    /// Encode and write `value` to `key`, reporting failures to the caller.
    pub(crate) fn try_store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
            reason: e.to_string(),
        })?;
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        storage::InMemoryStore,
        tasks::{Task, TaskId, Theme},
    };

    /// Store whose reads and writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<String, StoreError> {
            Err(StoreError::Storage {
                reason: "disk on fire".into(),
            })
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Storage {
                reason: "read-only".into(),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn missing_slot_returns_default() {
        let slots = SlotStore::new(InMemoryStore::new());
        let tasks: Vec<Task> = slots.load("tasks", Vec::new());
        assert!(tasks.is_empty());
        assert_eq!(slots.load("theme", Theme::Light), Theme::Light);
    }

    #[test]
    fn task_list_round_trips() {
        let slots = SlotStore::new(InMemoryStore::new());
        let mut done = Task::new(TaskId(2), "Ship");
        done.completed = true;
        let tasks = vec![Task::new(TaskId(1), "Write docs"), done];

        slots.store("tasks", &tasks);
        assert_eq!(slots.load::<Vec<Task>>("tasks", Vec::new()), tasks);
    }

    #[test]
    fn theme_round_trips() {
        let slots = SlotStore::new(InMemoryStore::new());
        slots.store("theme", &Theme::Dark);
        assert_eq!(slots.inner().get("theme").expect("raw"), "\"dark\"");
        assert_eq!(slots.load("theme", Theme::Light), Theme::Dark);
    }

    #[test]
    fn corrupt_slot_falls_back_to_default() {
        let store = InMemoryStore::new();
        store.set("tasks", "{not json").expect("set");
        store.set("theme", "\"sepia\"").expect("set");
        let slots = SlotStore::new(store);

        assert!(slots.load::<Vec<Task>>("tasks", Vec::new()).is_empty());
        assert_eq!(slots.load("theme", Theme::Light), Theme::Light);
    }

    #[test]
    fn blank_slot_is_treated_as_missing() {
        let store = InMemoryStore::new();
        store.set("tasks", "  ").expect("set");
        let slots = SlotStore::new(store);
        assert!(slots.load::<Vec<Task>>("tasks", Vec::new()).is_empty());
    }

    #[test]
    fn read_failure_returns_default() {
        let slots = SlotStore::new(BrokenStore);
        assert_eq!(slots.load("theme", Theme::Dark), Theme::Dark);
    }

    #[test]
    fn write_failure_is_swallowed_but_observable() {
        let slots = SlotStore::new(BrokenStore);
        slots.store("theme", &Theme::Dark);

        let err = slots
            .try_store("theme", &Theme::Dark)
            .expect_err("write should fail");
        assert!(matches!(err, StoreError::Storage { .. }));
    }
}
