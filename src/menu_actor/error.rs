//! Error types for the Menu actor.

use crate::framework::FrameworkError;
use crate::model::StoreId;
use crate::store_actor::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    NotFound(String),

    #[error("Menu validation error: {0}")]
    Validation(String),

    #[error("Unknown store: {0}")]
    UnknownStore(StoreId),

    /// The store lookup made while creating an item failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Menu table unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for MenuError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => MenuError::NotFound(id),
            e if e.is_unavailable() => MenuError::Unavailable(e.to_string()),
            e => e
                .into_entity_error::<MenuError>()
                .unwrap_or_else(|e| MenuError::Unavailable(e.to_string())),
        }
    }
}
