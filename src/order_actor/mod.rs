//! # Order Actor
//!
//! Owns the order table and its lifecycle state machine.
//!
//! ## Overview
//!
//! Orders are the only contended rows in the system: staff members claim them, the sweeper
//! cancels them and customers retry them, all concurrently. Every one of those is an
//! [`OrderAction`] processed by the single order actor task, so each status change is a
//! compare-and-set on the row as it is at that moment.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`Order`], including pricing in `on_create`
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`]
//! - [`new()`] - Factory function that creates the actor and its client
//!
//! ## Dependencies
//!
//! The actor runs with an [`OrderContext`]: a [`MenuClient`] to price and validate items at
//! creation, and the [`Clock`] that stamps `created_at`.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::MenuClient;
use crate::clock::Clock;
use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Order;
use std::sync::Arc;

/// Dependencies injected into the order actor by `run`.
#[derive(Clone)]
pub struct OrderContext {
    pub menu: MenuClient,
    pub clock: Arc<dyn Clock>,
}

impl OrderContext {
    pub fn new(menu: MenuClient, clock: Arc<dyn Clock>) -> Self {
        Self { menu, clock }
    }
}

/// Creates a new Order actor and its client.
pub fn new() -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(64)
}
