//! Data - The single resource type served by the API.
//!
//! A [`Data`] is created in memory with `id == 0`, gets its id from the store
//! on first save, and is otherwise a plain value. Incoming payloads are
//! validated into a `Data` by [`Data::from_payload`]; stored entries are
//! rebuilt by [`Data::from_fields`].
//!
//! ## Example
//!
//! ```ignore
//! use data_service::{Data, Payload};
//! use serde_json::json;
//!
//! let payload = Payload::json(json!({ "name": "fido", "category": "dog" }))?;
//! let data = Data::from_payload(&payload)?;
//! assert!(data.available);
//! assert_eq!(data.id, 0);
//! ```

mod error;
mod payload;

use serde::Serialize;
use serde_json::Value;

use crate::store::Fields;

pub use error::ValidationError;
pub use payload::{is_truthy, Payload, TRUTHY_TOKENS};

/// One Data resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Data {
    /// 0 until the store assigns one.
    pub id: u64,
    pub name: String,
    pub category: String,
    pub available: bool,
}

impl Data {
    /// Build an unsaved entity.
    pub fn new(name: impl Into<String>, category: impl Into<String>, available: bool) -> Self {
        Self {
            id: 0,
            name: name.into(),
            category: category.into(),
            available,
        }
    }

    /// Whether the store has assigned an id yet.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Canonical `{id, name, category, available}` mapping.
    ///
    /// Used both as the stored representation and as the API output shape.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("id".into(), Value::from(self.id));
        fields.insert("name".into(), Value::from(self.name.clone()));
        fields.insert("category".into(), Value::from(self.category.clone()));
        fields.insert("available".into(), Value::from(self.available));
        fields
    }

    /// Rebuild an entity from its canonical mapping, id included.
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationError> {
        let id = match fields.get("id") {
            Some(value) => value
                .as_u64()
                .ok_or_else(|| ValidationError::new("id must be a non-negative integer"))?,
            None => 0,
        };
        let mut data = Self::from_payload(&Payload::Json(fields.clone()))?;
        data.id = id;
        Ok(data)
    }
}
