//! Durable client storage.
//!
//! A small string key/value store standing in for browser `localStorage`. The file backend keeps
//! every key in one JSON object and is the source of truth across process restarts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::errors::AppError;

/// Storage key holding the active theme name.
pub const THEME_KEY: &str = "theme";
/// Storage key holding the bearer token of the current session.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON user payload of the current session.
pub const USER_KEY: &str = "user";

/// Synchronous string key/value storage.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

fn lock(entries: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    // A panic mid-write leaves the map itself consistent
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Volatile storage, used for tests and for `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON-file backed storage.
///
/// A write only reaches the in-memory map once the file holds it, so a failed write leaves both
/// unchanged.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the state file at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is logged and treated as empty so that
    /// the next write replaces it.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let entries = match fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable state file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened state file {:?} with {} keys", path, entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole map through a temporary file and rename it into place.
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(entries)?;
        fs::write(&tmp_path, body)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = lock(&self.entries);
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = lock(&self.entries);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(THEME_KEY).unwrap(), None);

        storage.set(THEME_KEY, "blue").unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("blue"));

        storage.remove(THEME_KEY).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("state.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(THEME_KEY, "dark").unwrap();
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.remove(TOKEN_KEY).unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(THEME_KEY).unwrap(), None);

        storage.set(THEME_KEY, "light").unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"theme\": \"light\""));
    }

    #[test]
    fn test_file_storage_failed_write_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set(TOKEN_KEY, "abc").unwrap();

        // A directory in place of the temp file makes every flush fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        assert!(matches!(storage.remove(TOKEN_KEY), Err(AppError::Storage(_))));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));

        assert!(storage.set(THEME_KEY, "dark").is_err());
        assert_eq!(storage.get(THEME_KEY).unwrap(), None);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get(THEME_KEY).unwrap(), None);
    }
}
