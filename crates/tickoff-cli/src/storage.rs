use std::{path::PathBuf, sync::Arc};

use crate::config::Config;
use color_eyre::Result;
use dirs::data_dir;
use tickoff_core::storage::{InMemoryStore, KeyValueStore};
use tickoff_storage::FileStore;
use tracing::debug;

/// Store handle shared by the CLI commands and the TUI.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Resolve the default data directory for Tickoff.
pub fn default_data_dir() -> Result<PathBuf> {
    let base = data_dir().ok_or_else(|| color_eyre::eyre::eyre!("no data dir available"))?;
    Ok(base.join("tickoff"))
}

/// Data directory from config, falling back to the platform default.
pub fn resolve_data_dir(config: &Config) -> Result<PathBuf> {
    match &config.data_dir {
        Some(root) => Ok(root.clone()),
        None => default_data_dir(),
    }
}

/// Build the slot store: on-disk unless `ephemeral` asks for a throwaway in-memory one.
pub fn store_from_config(config: &Config, ephemeral: bool) -> Result<SharedStore> {
    if ephemeral {
        debug!("using in-memory store");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let root = resolve_data_dir(config)?;
    debug!(?root, "initializing file store");
    Ok(Arc::new(FileStore::new(root)))
}
