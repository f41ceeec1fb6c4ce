//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, as opposed to the per-table errors that entities
//! return from their hooks (those travel inside [`FrameworkError::EntityError`]).

/// Errors that can occur within the actor framework.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The actor task is gone; the request never reached it.
    #[error("Actor closed")]
    ActorClosed,
    /// The actor accepted the request but dropped the reply channel.
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recover the concrete entity error, if this is one of type `E`.
    ///
    /// Typed clients use this to hand their callers the table's own error enum instead of a
    /// stringly wrapped one.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(e) => Ok(*e),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }

    /// True when the actor could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorDropped)
    }
}
