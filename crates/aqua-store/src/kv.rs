//! # Key-Value Store
//!
//! The opaque get/set/remove seam the persistence adapter writes through.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Persistence ──► dyn KeyValueStore                                      │
//! │                      ├── MemoryStore  (tests, ephemeral sessions)       │
//! │                      └── SqliteStore  (kv_store table, WAL)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StoreResult;

/// Async byte-oriented key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value; `None` when the key was never written or was removed.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Deletes a value. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Process-local store backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("aquastore-cart").await.unwrap(), None);

        store.set("aquastore-cart", b"[]").await.unwrap();
        assert_eq!(store.get("aquastore-cart").await.unwrap(), Some(b"[]".to_vec()));

        store.set("aquastore-cart", b"[1]").await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("aquastore-cart").await.unwrap(), Some(b"[1]".to_vec()));

        store.remove("aquastore-cart").await.unwrap();
        store.remove("aquastore-cart").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.set("k", b"v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
