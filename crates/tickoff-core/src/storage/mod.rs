//! Key-value storage contract plus the typed slot adapter built on top of it.

mod kv_store;
mod slot;

pub use kv_store::{InMemoryStore, KeyValueStore, StoreError};
pub use slot::SlotStore;
