use std::fs;
use std::path::PathBuf;

use crate::error::{StorageError, StorageResult};

/// String key-value store, the local equivalent of browser local storage.
///
/// Every `set` overwrites the whole value of a key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        Ok(Self { dir })
    }

    /// File path holding `key`
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::io(&path, e))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        // Write a temp file and rename it so a crash never leaves half a JSON file
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(|e| StorageError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| StorageError::io(&path, e))
    }
}

/// In-memory store for tests. `fail_writes` simulates a full or disabled
/// storage backend.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub entries: std::collections::HashMap<String, String>,
    pub fail_writes: bool,
    pub writes: usize,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::io(
                key,
                std::io::Error::new(std::io::ErrorKind::StorageFull, "quota exceeded"),
            ));
        }
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_set_get_overwrite() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("study-tasks").unwrap(), None);
        store.set("study-tasks", "[]").unwrap();
        assert_eq!(store.get("study-tasks").unwrap().as_deref(), Some("[]"));
        store.set("study-tasks", "[1]").unwrap();
        assert_eq!(store.get("study-tasks").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("data").join("study-tasks.json").exists());
        assert!(!dir.path().join("data").join("study-tasks.json.tmp").exists());
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("nothing-here").unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(store.path_for("../evil"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.path_for(".hidden"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.path_for(""), Err(StorageError::InvalidKey(_))));
    }
}
