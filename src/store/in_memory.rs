//! InMemoryStore - HashMap-backed key-value store for testing and development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{CompareAndSet, Fields, KeyValueStore, StoreError};

/// In-memory store backed by a HashMap and an atomic id counter.
///
/// Clone-friendly via Arc: clones share both the entries and the counter.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<u64, Fields>>>,
    counter: Arc<AtomicU64>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.len())
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for InMemoryStore {
    fn put(&self, id: u64, fields: &Fields) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        entries.insert(id, fields.clone());
        Ok(())
    }

    fn get(&self, id: u64) -> Result<Option<Fields>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.get(&id).cloned())
    }

    fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        entries.remove(&id);
        Ok(())
    }

    fn all_ids(&self) -> Result<Vec<u64>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(entries.keys().copied().collect())
    }

    fn next_id(&self) -> Result<u64, StoreError> {
        Ok(self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn compare_and_set(
        &self,
        id: u64,
        field: &str,
        expected: &Value,
        new: Value,
    ) -> Result<CompareAndSet, StoreError> {
        // Check and write under one write guard.
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        let Some(fields) = entries.get_mut(&id) else {
            return Ok(CompareAndSet::Missing);
        };

        if fields.get(field) != Some(expected) {
            return Ok(CompareAndSet::Mismatch(fields.clone()));
        }

        fields.insert(field.to_string(), new);
        Ok(CompareAndSet::Swapped(fields.clone()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        entries.clear();
        Ok(())
    }
}
