//! In-memory key-value storage for tests and previews.

use super::{KeyValueStorage, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Process-local map; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.items.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
