//! Local persistent storage.
//!
//! A tiny string key-value store on disk: every key is a `<key>.json` file
//! under one directory and holds exactly the serialized value written for it.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory holding one file per key
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    ///
    /// # Arguments
    /// * `dir` - Storage directory (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read the raw value stored under `key`.
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Stored text, `None` if the key was never written
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        tracing::trace!(key, bytes = content.len(), "read storage key");
        Ok(Some(content))
    }

    /// Overwrite the value stored under `key`.
    ///
    /// # Details
    /// Creates the storage directory if needed, writes to a temporary file and
    /// renames it over the target so a crash never leaves a half-written value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(key, path = %path.display(), "wrote storage key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert!(store.get_item("foodRatings").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested").join("storage"));

        store.set_item("ratings", "[1,2,3,4]").unwrap();
        assert_eq!(store.get_item("ratings").unwrap().as_deref(), Some("[1,2,3,4]"));

        store.set_item("ratings", "[0,0,0,0]").unwrap();
        assert_eq!(store.get_item("ratings").unwrap().as_deref(), Some("[0,0,0,0]"));
        assert!(!store.dir().join("ratings.json.tmp").exists());
    }

    #[test]
    fn test_keys_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set_item("foodRatings", "{}").unwrap();
        store.set_item("ratings", "[]").unwrap();
        assert_eq!(store.get_item("foodRatings").unwrap().as_deref(), Some("{}"));
        assert_eq!(store.get_item("ratings").unwrap().as_deref(), Some("[]"));
    }
}
