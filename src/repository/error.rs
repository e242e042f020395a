use std::fmt;

use crate::data::ValidationError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The entity was not in a state the operation accepts.
    Validation(String),
    NotFound(u64),
    /// Purchase of an entity that is already unavailable.
    Conflict(u64),
    Store(StoreError),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Validation(message) => write!(f, "{}", message),
            RepositoryError::NotFound(id) => {
                write!(f, "Data with id '{}' was not found.", id)
            }
            RepositoryError::Conflict(id) => {
                write!(f, "Data with id '{}' is not available.", id)
            }
            RepositoryError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepositoryError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        RepositoryError::Store(err)
    }
}

impl From<ValidationError> for RepositoryError {
    fn from(err: ValidationError) -> Self {
        RepositoryError::Validation(err.message().to_string())
    }
}
