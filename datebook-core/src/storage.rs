//! Durable key-value slots.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{DatebookError, DatebookResult};

/// A string key-value store the event store persists into.
pub trait Storage {
    /// Read a slot. A missing slot is `Ok(None)`.
    fn read(&self, key: &str) -> DatebookResult<Option<String>>;

    fn write(&mut self, key: &str, value: &str) -> DatebookResult<()>;

    fn remove(&mut self, key: &str) -> DatebookResult<()>;
}

/// One `<key>.json` file per slot inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> DatebookResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');

        if !valid {
            return Err(DatebookError::Storage(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> DatebookResult<Option<String>> {
        let path = self.path_for(key)?;

        if !path.exists() {
            return Ok(None);
        }

        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> DatebookResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write to a sibling then rename so a crash never leaves half a file
        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DatebookResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-memory slots, for tests and embedders without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> DatebookResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> DatebookResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DatebookResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.read("calendar-events").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        storage.write("calendar-events", "[]").unwrap();
        storage.write("calendar-events", "[1]").unwrap();

        assert_eq!(storage.read("calendar-events").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join("nested/calendar-events.json.tmp").exists());

        storage.remove("calendar-events").unwrap();
        assert!(storage.read("calendar-events").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert!(storage.write("../escape", "x").is_err());
        assert!(storage.read("").is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new().with_slot("a", "1");
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        storage.remove("a").unwrap();
        assert!(storage.read("a").unwrap().is_none());
    }
}
