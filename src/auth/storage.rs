use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StorageError;

/// Key under which the admin token is persisted
pub const TOKEN_STORAGE_KEY: &str = "dutying_admin_token";

const STORAGE_FILE: &str = "storage.json";

/// Minimal local-storage style key/value persistence
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Key/value pairs kept as one JSON object on disk.
///
/// Every write rewrites the whole file; a missing file reads as empty.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage file inside the given config directory
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join(STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content).map_err(io_err)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

/// Non-persistent storage, mostly for tests
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.lock().remove(key);
        Ok(())
    }
}

/// The single persisted admin token
pub struct TokenStore {
    storage: Box<dyn KeyValueStorage>,
}

impl TokenStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(FileStorage::in_dir(config_dir))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Blank values are treated as absent.
    pub fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .storage
            .get_item(TOKEN_STORAGE_KEY)?
            .filter(|t| !t.trim().is_empty()))
    }

    pub fn save(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set_item(TOKEN_STORAGE_KEY, token)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(TOKEN_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());

        storage.set_item("theme", "dark").unwrap();
        storage.set_item(TOKEN_STORAGE_KEY, "abc").unwrap();
        storage.remove_item(TOKEN_STORAGE_KEY).unwrap();

        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(storage.get_item(TOKEN_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::in_dir(&dir.path().join("nested"));
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        fs::write(storage.path(), "{not json").unwrap();

        assert!(matches!(storage.get_item(TOKEN_STORAGE_KEY), Err(StorageError::Json(_))));
    }
}
