use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::types::errors::StorageError;
use crate::types::snapshot::WindowSnapshot;

/// The host-style key-value store saved layouts are written to.
///
/// Every `set` fully replaces the value at its key.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn set(&self, key: &str, value: &WindowSnapshot) -> Result<(), StorageError>;
    async fn get(&self, key: &str) -> Result<Option<WindowSnapshot>, StorageError>;
    async fn get_all(&self) -> Result<BTreeMap<String, WindowSnapshot>, StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, WindowSnapshot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store that already holds the given entries.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, WindowSnapshot)>,
        K: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// Copy of everything currently stored.
    pub fn entries(&self) -> BTreeMap<String, WindowSnapshot> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, WindowSnapshot>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn set(&self, key: &str, value: &WindowSnapshot) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<WindowSnapshot>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn get_all(&self) -> Result<BTreeMap<String, WindowSnapshot>, StorageError> {
        Ok(self.lock()?.clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.clear();
        Ok(())
    }
}
