//! In-memory storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{CartStorage, StorageError};

/// Storage backed by a shared in-process map.
///
/// Clones share the same map, so a test can keep a handle and inspect what a
/// store wrote, or hand the same map to a second store to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.insert(key, value);
        storage
    }

    /// Insert an entry without going through the async API.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().insert(key.into(), value.into());
    }

    /// Read an entry without going through the async API.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, String>> {
        // Entries are plain strings, so a poisoned map is still consistent.
        self.entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.write().insert(key.to_string(), value);
        Ok(())
    }
}
