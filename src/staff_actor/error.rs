//! Error types for the Staff actor.

use crate::framework::FrameworkError;
use crate::model::StoreId;
use crate::store_actor::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StaffError {
    #[error("Staff member not found: {0}")]
    NotFound(String),

    #[error("Staff validation error: {0}")]
    Validation(String),

    #[error("Unknown store: {0}")]
    UnknownStore(StoreId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Staff table unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for StaffError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => StaffError::NotFound(id),
            e if e.is_unavailable() => StaffError::Unavailable(e.to_string()),
            e => e
                .into_entity_error::<StaffError>()
                .unwrap_or_else(|e| StaffError::Unavailable(e.to_string())),
        }
    }
}
