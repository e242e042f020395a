//! Repository - CRUD, filtered queries and the purchase action over a store.
//!
//! The repository holds no entity state of its own: every call round-trips
//! through the injected [`KeyValueStore`](crate::store::KeyValueStore), so a
//! fresh store per test gives full isolation.

mod data_repository;
mod error;

pub use data_repository::DataRepository;
pub use error::RepositoryError;
