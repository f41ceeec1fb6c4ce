//! Startup, wiring and shutdown of the running service.
//!
//! - [`PickupSystem`] spawns the table actors, seeds the catalog and builds the flow router
//! - [`setup_tracing`] initializes logging

pub mod pickup_system;
pub mod tracing;

pub use pickup_system::*;
pub use tracing::*;
