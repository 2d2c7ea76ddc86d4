//! Key/value storage for character data.
//!
//! The cache persists through a deliberately small interface: string values
//! under string keys, with writes that may be refused (quota, disk full).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{StorageError, StorageResult};

/// Persisted string storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// In-memory store, mainly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse writes that would grow the store past `quota_bytes`
    /// (keys plus values).
    #[must_use]
    pub const fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut items = self.items();
        if let Some(quota) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = (others + key.len() + value.len()) as u64;
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items().remove(key);
        Ok(())
    }
}
