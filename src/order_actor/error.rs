//! Error types for the Order actor.

use crate::framework::FrameworkError;
use crate::model::{OrderId, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order data or the caller does not fit the order (empty items, foreign store, wrong
    /// staff member).
    #[error("Order validation error: {0}")]
    Validation(String),

    /// The order is not in the status the transition requires.
    #[error("Order {id} is already {status}")]
    Conflict { id: OrderId, status: OrderStatus },

    /// A time-based transition was attempted before its time.
    #[error("Order {0} is not due")]
    NotDue(OrderId),

    /// The order table or the menu it prices against could not be reached.
    #[error("Order table unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            e if e.is_unavailable() => OrderError::Unavailable(e.to_string()),
            e => e
                .into_entity_error::<OrderError>()
                .unwrap_or_else(|e| OrderError::Unavailable(e.to_string())),
        }
    }
}
