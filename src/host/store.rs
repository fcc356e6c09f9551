//! Key-value store implementations

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::KeyValueStore;
use crate::error::{LoggerError, Result};

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    ///
    /// Characters outside `[A-Za-z0-9_.-]` are replaced so a key can never
    /// escape the store directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe = safe.trim_start_matches('.');
        self.dir.join(format!("{}.json", safe))
    }
}

fn store_error(key: &str, source: std::io::Error) -> LoggerError {
    LoggerError::Store {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| store_error(key, e))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| store_error(key, e))?;
        std::fs::write(self.path_for(key), value).map_err(|e| store_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path).map_err(|e| store_error(key, e))
    }
}

/// Store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .read()
            .ok()
            .and_then(|e| e.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.get("loggerPersist").unwrap(), None);
        assert!(store.remove("loggerPersist").is_ok());
    }

    #[test]
    fn test_file_store_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested"));

        store.set("loggerPersist", "{\"a\":1}").unwrap();
        assert!(temp_dir.path().join("nested/loggerPersist.json").exists());
        assert_eq!(store.get("loggerPersist").unwrap().as_deref(), Some("{\"a\":1}"));

        store.set("loggerPersist", "{}").unwrap();
        assert_eq!(store.get("loggerPersist").unwrap().as_deref(), Some("{}"));

        store.remove("loggerPersist").unwrap();
        assert_eq!(store.get("loggerPersist").unwrap(), None);
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let store = FileStore::new("/tmp/store");
        assert_eq!(store.path_for("../etc/passwd"), PathBuf::from("/tmp/store/_etc_passwd.json"));
        assert_eq!(store.path_for("app logger"), PathBuf::from("/tmp/store/app_logger.json"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
