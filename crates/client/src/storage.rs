//! Injected key-value storage capability.
//!
//! The session and the cart are persisted through this trait instead of
//! any ambient global, so tests can substitute [`MemoryStorage`] and the
//! CLI can use [`FileStorage`]. Keys are the wire names the persisted
//! state has always used; see [`keys`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Key for the short-lived access token (raw string).
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Key for the long-lived refresh token (raw string).
    pub const REFRESH_TOKEN: &str = "refreshToken";

    /// Key for the signed-in user profile (JSON).
    pub const USER: &str = "user";

    /// Key for the persisted cart (JSON list of `{product, quantity}`).
    pub const CART: &str = "cart";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store contents could not be serialized.
    #[error("storage serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string key-value store for persisted client state.
///
/// Implementations must be safe to share across tasks; the callers
/// (session manager, cart store) each serialize their own writes, so a
/// backend only needs per-operation consistency.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}

impl MemoryStorage {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock means a panic mid-insert on a HashMap of owned
        // strings; the map itself is still structurally sound.
        self.map.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// File-backed storage: a single JSON object on disk.
///
/// Writes are serialized in-process through a mutex and flushed with a
/// whole-file rewrite. Across processes this is last-writer-wins; Sunbird
/// does not coordinate concurrent writers (multi-tab style coordination is
/// explicitly out of scope).
pub struct FileStorage {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) file-backed storage at `path`.
    ///
    /// A missing or unreadable file starts empty rather than failing, so a
    /// corrupt state file degrades to a signed-out, empty-cart client.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(path: PathBuf) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let map = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "state file is not valid JSON, starting empty"
                );
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn flush(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.lock();
        map.insert(key.to_owned(), value.to_owned());
        self.flush(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.lock();
        if map.remove(key).is_some() {
            return self.flush(&map);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sunbird-storage-test-{tag}-{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));

        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let path = temp_state_file("reopen");
        let _ = std::fs::remove_file(&path);

        {
            let storage = FileStorage::new(path.clone()).unwrap();
            storage.set(keys::ACCESS_TOKEN, "tok-1").unwrap();
            storage.set(keys::CART, "[]").unwrap();
        }

        let reopened = FileStorage::new(path.clone()).unwrap();
        assert_eq!(
            reopened.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("tok-1")
        );
        assert_eq!(reopened.get(keys::CART).unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_state_file_starts_empty() {
        let path = temp_state_file("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::new(path.clone()).unwrap();
        assert_eq!(storage.get(keys::USER).unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }
}
