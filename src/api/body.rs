//! Request body decoding by content type.

use crate::data::Payload;

use super::ApiError;

pub const JSON: &str = "application/json";
pub const FORM: &str = "application/x-www-form-urlencoded";

/// Decode a create/update body into a [`Payload`].
///
/// Parameters on the content type (`; charset=utf-8`) are ignored.
pub fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<Payload, ApiError> {
    let Some(content_type) = content_type else {
        return Err(ApiError::BadRequest("Content-Type must be set".into()));
    };

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        JSON => {
            let value = serde_json::from_slice(body)
                .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;
            Ok(Payload::json(value)?)
        }
        FORM => Ok(Payload::form(url::form_urlencoded::parse(body).into_owned())),
        _ => Err(ApiError::UnsupportedMediaType(format!(
            "Content-Type must be {} or {}, got '{}'",
            JSON, FORM, content_type
        ))),
    }
}
