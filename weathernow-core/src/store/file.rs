use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use super::KeyValueStore;
use crate::error::StoreError;

/// File-backed store: one JSON object per store file, mapping keys to raw
/// string values.
///
/// Every `set` rewrites the whole file, so the last writer wins. That is fine
/// for the small, single-process payloads this app keeps; anything
/// heavier-weight belongs in a different [`KeyValueStore`] impl.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            // First run: nothing written yet.
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn set_then_get_returns_the_value() {
        let dir = tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("store.json"));

        store.set("greeting", "hello").await.expect("set must succeed");

        let value = store.get("greeting").await.expect("get must succeed");
        assert_eq!(value.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn missing_key_and_missing_file_are_none() {
        let dir = tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("store.json"));

        // No file on disk yet.
        assert_eq!(store.get("anything").await.expect("get"), None);

        store.set("present", "1").await.expect("set");
        assert_eq!(store.get("absent").await.expect("get"), None);
    }

    #[tokio::test]
    async fn set_creates_missing_parent_directories() {
        let dir = tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("nested/deeper/store.json"));

        store.set("k", "v").await.expect("set must create parents");

        let reopened = FileStore::new(dir.path().join("nested/deeper/store.json"));
        assert_eq!(reopened.get("k").await.expect("get").as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn keys_do_not_clobber_each_other() {
        let dir = tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("store.json"));

        store.set("a", "1").await.expect("set");
        store.set("b", "2").await.expect("set");
        store.set("a", "3").await.expect("set");

        assert_eq!(store.get("a").await.expect("get").as_deref(), Some("3"));
        assert_eq!(store.get("b").await.expect("get").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn corrupt_store_file_surfaces_an_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "not json at all").expect("write corrupt file");

        let store = FileStore::new(&path);

        assert!(matches!(
            store.get("k").await,
            Err(StoreError::Json(_))
        ));
    }
}
