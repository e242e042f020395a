//! HTTP API integration tests.

#[cfg(feature = "http")]
mod crud;
#[cfg(feature = "http")]
mod purchase;
