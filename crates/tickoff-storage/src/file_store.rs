use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tempfile::NamedTempFile;
use tickoff_core::storage::{KeyValueStore, StoreError};
use tracing::instrument;

/// Marks file names whose key had to be encoded.
const ENCODED_PREFIX: char = '~';
const EXTENSION: &str = "json";

/// File-backed store implementing the shared `KeyValueStore` contract.
/// Each key lives in its own file under `root`; writes replace the file atomically.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", sanitize_key(key)))
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<String, StoreError> {
        let path = self.path_for(key);
        fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound {
                    key: key.to_string(),
                }
            } else {
                storage_err(err)
            }
        })
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        write_atomic(&path, value.as_bytes())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_err(err)),
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = path.parent().ok_or_else(|| StoreError::Storage {
        reason: "invalid storage path".to_string(),
    })?;
    fs::create_dir_all(parent).map_err(storage_err)?;

    // Temp file in the same directory so the rename stays on one filesystem.
    let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
    tmp.write_all(bytes).map_err(storage_err)?;
    tmp.flush().map_err(storage_err)?;
    tmp.persist(path).map_err(|e| storage_err(e.error))?;
    Ok(())
}

/// Plain keys map to themselves; anything else is base64 encoded behind a prefix
/// that plain keys cannot contain, so two keys never share a file.
fn sanitize_key(key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        key.to_string()
    } else {
        format!("{ENCODED_PREFIX}{}", URL_SAFE_NO_PAD.encode(key))
    }
}

fn storage_err<E: ToString>(err: E) -> StoreError {
    StoreError::Storage {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_writes_readable_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        store.set("tasks", r#"[{"id":1}]"#).expect("set");
        assert_eq!(store.get("tasks").expect("get"), r#"[{"id":1}]"#);

        let on_disk = fs::read_to_string(dir.path().join("tasks.json")).expect("read file");
        assert_eq!(on_disk, r#"[{"id":1}]"#);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        store.set("theme", "\"light\"").expect("set");
        store.set("theme", "\"dark\"").expect("overwrite");
        assert_eq!(store.get("theme").expect("get"), "\"dark\"");
    }

    #[test]
    fn creates_missing_root_on_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("nested").join("data"));
        store.set("theme", "\"dark\"").expect("set");
        assert!(store.root().join("theme.json").exists());
    }

    #[test]
    fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        let err = store.get("tasks").expect_err("should be missing");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        store.set("k", "v").expect("set");
        store.remove("k").expect("remove");
        store.remove("k").expect("remove again");

        let err = store.get("k").expect_err("should be missing");
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn unsafe_keys_are_encoded_without_collisions() {
        assert_eq!(sanitize_key("tasks"), "tasks");
        assert_eq!(sanitize_key("health_probe-1"), "health_probe-1");

        let encoded = sanitize_key("../etc/passwd");
        assert!(encoded.starts_with(ENCODED_PREFIX));
        assert!(!encoded.contains('/'));
        assert_ne!(sanitize_key("a/b"), sanitize_key("a_b"));
        assert!(sanitize_key("").starts_with(ENCODED_PREFIX));
    }
}
