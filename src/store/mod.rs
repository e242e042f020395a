//! Store - Narrow contract over the backing key-value store.
//!
//! Every entity lives in the store as a flat field mapping keyed by a numeric
//! id. The store owns id generation and exposes the two atomic primitives the
//! rest of the service relies on: [`KeyValueStore::next_id`] (atomic increment)
//! and [`KeyValueStore::compare_and_set`] (conditional field write).
//!
//! ## Example
//!
//! ```ignore
//! use data_service::{InMemoryStore, KeyValueStore};
//! use serde_json::{json, Map};
//!
//! let store = InMemoryStore::new();
//! let id = store.next_id()?;
//! let mut fields = Map::new();
//! fields.insert("available".into(), json!(true));
//! store.put(id, &fields)?;
//! ```

mod in_memory;

use serde_json::{Map, Value};
use std::fmt;

/// Raw field mapping for one stored entry.
pub type Fields = Map<String, Value>;

/// Outcome of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum CompareAndSet {
    /// The field matched and was replaced. Carries the entry after the write.
    Swapped(Fields),
    /// The field did not match; nothing was written. Carries the current entry.
    Mismatch(Fields),
    /// No entry exists for the id.
    Missing,
}

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not serve the call (poisoned lock, lost connection, timeout).
    Unavailable(String),
    /// A stored entry could not be decoded.
    Corrupt(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "corrupt store entry: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Abstract key-value storage for entity field mappings.
///
/// Implementations must be safe for concurrent use. `next_id` and
/// `compare_and_set` must be atomic in the backend itself, not emulated with a
/// read followed by a write from the caller.
pub trait KeyValueStore: Send + Sync {
    /// Write the full field mapping for `id`, replacing any previous entry.
    fn put(&self, id: u64, fields: &Fields) -> Result<(), StoreError>;

    /// Point lookup. Returns None if absent.
    fn get(&self, id: u64) -> Result<Option<Fields>, StoreError>;

    /// Remove the entry for `id`. Absent ids are a no-op.
    fn delete(&self, id: u64) -> Result<(), StoreError>;

    /// Every stored id, in store-defined order.
    fn all_ids(&self) -> Result<Vec<u64>, StoreError>;

    /// A fresh id, strictly greater than any id issued before.
    fn next_id(&self) -> Result<u64, StoreError>;

    /// Replace `field` with `new` only if it currently equals `expected`.
    fn compare_and_set(
        &self,
        id: u64,
        field: &str,
        expected: &Value,
        new: Value,
    ) -> Result<CompareAndSet, StoreError>;

    /// Remove every entry. The id counter keeps counting.
    fn clear(&self) -> Result<(), StoreError>;
}

pub use in_memory::InMemoryStore;
