//! # ActorEntity Trait
//!
//! The contract every table row type (User, Store, MenuItem, Staff, Order) implements so that a
//! generic [`ResourceActor`](crate::framework::ResourceActor) can own it.
//!
//! Rows are created from a DTO (`Create`), read back by id or by predicate, and mutated only
//! through entity-specific `Action`s. There is no generic update path: every mutation of a row is a
//! named transition that the entity validates against its own current state, which is what makes
//! status changes compare-and-set.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] defaults to `Ok(())`. Override it to validate the new row against
//!   other tables through the injected `Context`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any row type must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// The trait is `#[async_trait]` so hooks can call other actors. The `Context` type is injected
/// into every hook by `ResourceActor::run`, which lets dependencies (other clients, the clock) be
/// wired after every actor has been constructed.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// Row identifier. Generated from a per-table counter, and ordered so that scans come back in
    /// insertion order.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to insert a new row.
    type Create: Send + Sync + Debug;

    /// Entity-specific transitions (e.g. `Claim`, `Expire`).
    type Action: Send + Sync + Debug;

    /// Result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into the actor. `()` when there are none.
    type Context: Send + Sync;

    /// Per-table error type.
    ///
    /// One enum per table rather than one per action: callers match on a single type and the
    /// framework can box it uniformly in [`FrameworkError::EntityError`](crate::framework::FrameworkError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the row from its id and payload. Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after construction and before the row is stored. A failure discards the row.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an action to the row. The row is only written back when this returns `Ok`.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
