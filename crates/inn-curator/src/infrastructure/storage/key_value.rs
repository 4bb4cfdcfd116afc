//! Key-value storage adapters.
//!
//! [`KeyValueStore`] is the contract of browser local storage: string keys,
//! string values, whole-value reads and writes.  Two implementations:
//!
//! - [`MemoryStore`] keeps entries in memory.  Used by tests and by sessions
//!   that should not leave anything behind.
//! - [`JsonFileStore`] keeps every entry in one JSON object file.  The file is
//!   rewritten whole on every change; other keys in the file are preserved.
//!   A write that finds the file corrupt moves it aside to
//!   `storage.json.corrupt` and starts over from an empty store.
//!
//! [`NamespacedEntry`] binds a store to one key and is what the config store
//! actually persists through.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use super::{platform_data_dir, StorageError};
use crate::application::config_store::{ConfigPersistence, PersistenceError};

/// Key under which the site config is stored.
pub const DEFAULT_STORAGE_KEY: &str = "shipinn_heritage_vault_v1";

/// File name of the storage file inside the platform data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// String-keyed storage of string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// In-memory store.  Contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

// ── JsonFileStore ─────────────────────────────────────────────────────────────

/// File-backed store: one JSON object mapping keys to string values.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store at `<platform data dir>/storage.json`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoPlatformDir`] when the platform directory
    /// cannot be determined from the environment.
    pub fn at_default_location() -> Result<Self, StorageError> {
        Ok(Self::new(default_storage_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt file is moved: `<file name>.corrupt` beside it.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Reads the whole file.  A missing file is an empty store.
    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Corrupt {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Reads the file before a write.  A corrupt file is moved aside so the
    /// store can recover; the write then starts from an empty map.
    fn read_entries_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt { source, .. }) => {
                let aside = self.corrupt_path();
                warn!(
                    "storage file {} is corrupt ({source}); moving it to {}",
                    self.path.display(),
                    aside.display()
                );
                std::fs::rename(&self.path, &aside).map_err(|source| StorageError::Io {
                    path: aside.clone(),
                    source,
                })?;
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("wrote {} storage entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_entries_for_write()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Resolves `<platform data dir>/storage.json`.
///
/// # Errors
///
/// Returns [`StorageError::NoPlatformDir`] if the base directory cannot be
/// determined.
pub fn default_storage_path() -> Result<PathBuf, StorageError> {
    platform_data_dir()
        .map(|dir| dir.join(STORAGE_FILE_NAME))
        .ok_or(StorageError::NoPlatformDir)
}

// ── NamespacedEntry ───────────────────────────────────────────────────────────

/// One key of a [`KeyValueStore`], exposed as [`ConfigPersistence`].
#[derive(Debug, Clone)]
pub struct NamespacedEntry<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> NamespacedEntry<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Binds `store` to [`DEFAULT_STORAGE_KEY`].
    pub fn site_config(store: S) -> Self {
        Self::new(store, DEFAULT_STORAGE_KEY)
    }
}

impl<S: KeyValueStore> ConfigPersistence for NamespacedEntry<S> {
    fn load(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self.store.get(&self.key)?)
    }

    fn save(&self, json: &str) -> Result<(), PersistenceError> {
        Ok(self.store.set(&self.key, json)?)
    }

    fn clear(&self) -> Result<(), PersistenceError> {
        Ok(self.store.remove(&self.key)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
