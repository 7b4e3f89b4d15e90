//! Durable storage implementations for the Tickoff key-value contract.

pub mod file_store;

pub use file_store::FileStore;
