//! Incoming payloads and the validation rules that turn them into [`Data`].

use std::collections::HashMap;

use serde_json::Value;

use super::{Data, ValidationError};
use crate::store::Fields;

/// Tokens accepted as `true` for form-encoded booleans (case-insensitive).
pub const TRUTHY_TOKENS: [&str; 3] = ["true", "1", "t"];

/// Coerce a form-style value into a boolean.
///
/// Surrounding whitespace is trimmed before matching, so `" t "` is `true`.
pub fn is_truthy(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&lowered.as_str())
}

/// A decoded request body, before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured JSON object; values keep their JSON types.
    Json(Fields),
    /// Form submission; every value is a string.
    Form(HashMap<String, String>),
}

impl Payload {
    /// Wrap a decoded JSON value. Anything other than an object is rejected.
    pub fn json(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(fields) => Ok(Payload::Json(fields)),
            _ => Err(ValidationError::new("request body must be a JSON object")),
        }
    }

    /// Collect form pairs. A repeated key keeps its first value.
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut form = HashMap::new();
        for (k, v) in pairs {
            form.entry(k.into()).or_insert_with(|| v.into());
        }
        Payload::Form(form)
    }
}

impl Data {
    /// Validate a payload into an unsaved entity.
    ///
    /// Any `id` in the payload is ignored; ids come from the store or the
    /// request path. Unknown fields are ignored.
    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        match payload {
            Payload::Json(fields) => from_json(fields),
            Payload::Form(fields) => from_form(fields),
        }
    }
}

fn from_json(fields: &Fields) -> Result<Data, ValidationError> {
    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Null) | None => String::new(),
        Some(_) => return Err(ValidationError::new("name must be a string")),
    };
    require_name(&name)?;

    let category = match fields.get("category") {
        Some(Value::String(category)) => category.clone(),
        Some(Value::Null) | None => String::new(),
        Some(_) => return Err(ValidationError::new("category must be a string")),
    };

    let available = match fields.get("available") {
        Some(Value::Bool(available)) => *available,
        Some(Value::Null) | None => true,
        Some(_) => return Err(ValidationError::new("available must be a boolean")),
    };

    Ok(Data {
        id: 0,
        name,
        category,
        available,
    })
}

fn from_form(fields: &HashMap<String, String>) -> Result<Data, ValidationError> {
    let name = fields.get("name").cloned().unwrap_or_default();
    require_name(&name)?;

    Ok(Data {
        id: 0,
        name,
        category: fields.get("category").cloned().unwrap_or_default(),
        available: fields.get("available").map_or(true, |raw| is_truthy(raw)),
    })
}

fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name is required"));
    }
    Ok(())
}
