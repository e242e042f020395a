//! data_service - a REST service for a single `Data` resource.
//!
//! Layers, leaves first:
//!
//! - [`store`]: the [`KeyValueStore`] contract and the bundled [`InMemoryStore`].
//! - [`data`]: the [`Data`] entity, incoming [`Payload`]s and their validation.
//! - [`repository`]: [`DataRepository`] CRUD, filtered queries and the atomic purchase.
//! - [`api`]: HTTP routes, body decoding and error-to-status mapping.

pub mod api;
pub mod config;
pub mod data;
pub mod repository;
pub mod store;
pub mod telemetry;

pub use api::ApiError;
pub use config::Config;
pub use data::{is_truthy, Data, Payload, ValidationError};
pub use repository::{DataRepository, RepositoryError};
pub use store::{CompareAndSet, Fields, InMemoryStore, KeyValueStore, StoreError};
