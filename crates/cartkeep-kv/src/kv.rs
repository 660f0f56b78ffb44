//! The key-value store contract.

use async_trait::async_trait;

use crate::KvResult;

/// Asynchronous string key-value store.
///
/// Values are opaque text; encoding them (JSON or otherwise) is the caller's
/// job. Implementations must be safe to share across tasks.
///
/// # Example
///
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.set("cart", "[]".to_string()).await?;
/// assert_eq!(store.get("cart").await?.as_deref(), Some("[]"));
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> KvResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> KvResult<()>;

    /// Remove every key in the store.
    async fn clear(&self) -> KvResult<()>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> KvResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
