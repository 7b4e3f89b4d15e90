//! Core abstractions for Tickoff: task domain types and the key-value storage contract.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod storage;
pub mod tasks;
