//! # User Actor
//!
//! Owns the customer table. Users are registered on first contact and never change afterwards,
//! so the table has no actions: [`UserClient::register`](crate::clients::UserClient::register)
//! and the inherited `get`/`query` are the whole surface.

pub mod entity;
pub mod error;

pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::User;

/// Creates a new User actor and its client.
pub fn new() -> (ResourceActor<User>, ResourceClient<User>) {
    ResourceActor::new(32)
}
