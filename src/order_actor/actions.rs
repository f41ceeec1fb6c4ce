//! Lifecycle transitions for the Order actor.
//!
//! Each action names the status it expects to find. The actor evaluates the action against the
//! row as it is when the message is processed, so a transition whose precondition no longer
//! holds (another staff member claimed first, the customer retried, the sweeper got there first)
//! fails with [`OrderError::Conflict`](crate::order_actor::OrderError::Conflict) or
//! [`OrderError::NotDue`](crate::order_actor::OrderError::NotDue) instead of overwriting.

use crate::model::{ChatId, StoreId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// `Created -> Accepted`, recording the staff member. The staff member's store must match.
    Claim { staff: ChatId, store_id: StoreId },
    /// `Accepted -> Completed`. Only the assigned staff member may complete.
    Complete { staff: ChatId },
    /// `Cancelled -> Created` with a fresh `created_at`. Only the customer may retry.
    Retry { client: ChatId },
    /// `Created -> Cancelled` when `created_at` is strictly before `cutoff`.
    Expire { cutoff: DateTime<Utc> },
    /// Flags an accepted order whose target time is at or before `due_before` as reminded.
    /// Succeeds once per order.
    MarkReminded { due_before: DateTime<Utc> },
}
