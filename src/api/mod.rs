//! api - REST surface for the Data resource.
//!
//! Requests are decoded into a [`Payload`](crate::Payload), validated into a
//! [`Data`](crate::Data), run against the [`DataRepository`](crate::DataRepository),
//! and every failure is mapped once to an [`ApiError`] with a fixed status
//! code and a `{status, error, message}` body.
//!
//! | Method & Path | Success | Failure |
//! |---|---|---|
//! | `GET /data` | 200 + array | |
//! | `GET /data/:id` | 200 | 404 |
//! | `POST /data` | 201 + `Location` | 400, 415 |
//! | `PUT /data/:id` | 200 | 400, 404 |
//! | `DELETE /data/:id` | 204 | |
//! | `PUT /data/:id/purchase` | 200 | 400, 404 |
//!
//! Other methods on these paths get 405; store failures get 500.

mod body;
mod error;

pub use body::{decode_body, FORM, JSON};
pub use error::ApiError;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve, AppState};
