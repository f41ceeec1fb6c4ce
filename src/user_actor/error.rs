//! Error types for the User actor.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User validation error: {0}")]
    Validation(String),

    /// The user table could not be reached.
    #[error("User table unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            e if e.is_unavailable() => UserError::Unavailable(e.to_string()),
            e => e
                .into_entity_error::<UserError>()
                .unwrap_or_else(|e| UserError::Unavailable(e.to_string())),
        }
    }
}
