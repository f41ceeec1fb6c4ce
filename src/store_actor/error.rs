//! Error types for the Store actor.

use crate::framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Store not found: {0}")]
    NotFound(String),

    #[error("Store validation error: {0}")]
    Validation(String),

    #[error("Store table unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for StoreError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => StoreError::NotFound(id),
            e if e.is_unavailable() => StoreError::Unavailable(e.to_string()),
            e => e
                .into_entity_error::<StoreError>()
                .unwrap_or_else(|e| StoreError::Unavailable(e.to_string())),
        }
    }
}
