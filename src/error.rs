//! Errors seen by the chat flows and by process bootstrap.
//!
//! Table errors collapse into four [`FlowError`] kinds, each of which the router turns into a
//! fixed kind of reply.

use crate::config::ConfigError;
use crate::menu_actor::MenuError;
use crate::order_actor::OrderError;
use crate::staff_actor::StaffError;
use crate::store_actor::StoreError;
use crate::user_actor::UserError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlowError {
    /// Bad input or a caller that does not fit the row. Re-prompt; state is kept.
    #[error("{0}")]
    Validation(String),

    /// The row the action refers to is gone.
    #[error("not found: {0}")]
    NotFound(String),

    /// Someone else changed the row first.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A table could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<OrderError> for FlowError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => FlowError::NotFound(id),
            OrderError::Validation(msg) => FlowError::Validation(msg),
            e @ (OrderError::Conflict { .. } | OrderError::NotDue(_)) => {
                FlowError::Conflict(e.to_string())
            }
            OrderError::Unavailable(msg) => FlowError::StoreUnavailable(msg),
        }
    }
}

impl From<StoreError> for FlowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => FlowError::NotFound(id),
            StoreError::Validation(msg) => FlowError::Validation(msg),
            StoreError::Unavailable(msg) => FlowError::StoreUnavailable(msg),
        }
    }
}

impl From<MenuError> for FlowError {
    fn from(e: MenuError) -> Self {
        match e {
            MenuError::NotFound(id) => FlowError::NotFound(id),
            MenuError::Validation(msg) => FlowError::Validation(msg),
            MenuError::UnknownStore(id) => FlowError::NotFound(id.to_string()),
            MenuError::Store(e) => e.into(),
            MenuError::Unavailable(msg) => FlowError::StoreUnavailable(msg),
        }
    }
}

impl From<StaffError> for FlowError {
    fn from(e: StaffError) -> Self {
        match e {
            StaffError::NotFound(id) => FlowError::NotFound(id),
            StaffError::Validation(msg) => FlowError::Validation(msg),
            StaffError::UnknownStore(id) => FlowError::NotFound(id.to_string()),
            StaffError::Store(e) => e.into(),
            StaffError::Unavailable(msg) => FlowError::StoreUnavailable(msg),
        }
    }
}

impl From<UserError> for FlowError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(id) => FlowError::NotFound(id),
            UserError::Validation(msg) => FlowError::Validation(msg),
            UserError::Unavailable(msg) => FlowError::StoreUnavailable(msg),
        }
    }
}

/// Failures while bringing the system up or down.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Seeding the catalog into the tables failed.
    #[error("seeding {what} failed: {reason}")]
    Seed { what: String, reason: String },

    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderStatus};

    #[test]
    fn test_order_errors_map_to_flow_kinds() {
        let conflict = OrderError::Conflict {
            id: OrderId(3),
            status: OrderStatus::Accepted,
        };
        assert!(matches!(FlowError::from(conflict), FlowError::Conflict(msg) if msg.contains("order_3")));
        assert_eq!(
            FlowError::from(OrderError::Unavailable("closed".into())),
            FlowError::StoreUnavailable("closed".into())
        );
        assert_eq!(
            FlowError::from(MenuError::Store(StoreError::Unavailable("x".into()))),
            FlowError::StoreUnavailable("x".into())
        );
    }
}
