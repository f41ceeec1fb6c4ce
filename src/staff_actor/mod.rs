//! # Staff Actor
//!
//! Owns the staff table. Members are enrolled from configuration and only their shift status
//! changes afterwards ([`StaffAction::SetStatus`]). Run with a
//! [`StoreClient`](crate::clients::StoreClient) as context so enrolment can check the store.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Staff;

/// Creates a new Staff actor and its client.
pub fn new() -> (ResourceActor<Staff>, ResourceClient<Staff>) {
    ResourceActor::new(32)
}
