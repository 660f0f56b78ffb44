//! Directory-backed store: one file per key.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tokio::fs;
use tracing::debug;

use crate::{KeyValueStore, KvError, KvResult};

const VALUE_EXTENSION: &str = "kv";

/// Persists each key as a file under a root directory.
///
/// File names are the URL-safe base64 encoding of the key, so any key is
/// representable on any filesystem. Writes go to a temporary sibling first
/// and are renamed into place, so readers never see a half-written value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> KvResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        debug!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> KvResult<PathBuf> {
        if key.is_empty() {
            return Err(KvError::InvalidKey("key must not be empty".to_string()));
        }
        let name = format!("{}.{}", URL_SAFE_NO_PAD.encode(key), VALUE_EXTENSION);
        Ok(self.root.join(name))
    }

    fn tmp_path_for(&self, path: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("{}.tmp{}", VALUE_EXTENSION, n))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.tmp_path_for(&path);

        fs::write(&tmp, value.as_bytes()).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self) -> KvResult<()> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(VALUE_EXTENSION) {
                fs::remove_file(&path).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::open(dir.path()).await.unwrap();
        store
            .set("@GoMarketplace:products", "[1,2]".to_string())
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("@GoMarketplace:products").await.unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        assert_eq!(store.get("absent").await.unwrap(), None);
        store.delete("absent").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();

        let err = store.set("", "x".to_string()).await.unwrap_err();
        assert!(matches!(err, KvError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_clear_only_removes_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), None);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_open_creates_nested_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("cart");

        let store = FileStore::open(&root).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }
}
