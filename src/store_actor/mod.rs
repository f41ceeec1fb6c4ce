//! # Store Actor
//!
//! Owns the store table. Stores are seeded from configuration at startup and read-only
//! afterwards.

pub mod entity;
pub mod error;

pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::Store;

/// Creates a new Store actor and its client.
pub fn new() -> (ResourceActor<Store>, ResourceClient<Store>) {
    ResourceActor::new(32)
}
