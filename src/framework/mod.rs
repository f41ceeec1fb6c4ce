//! # The Engine
//!
//! Generic table actors. A [`ResourceActor<T>`] owns the rows of one table and a
//! [`ResourceClient<T>`] talks to it; entities plug in through [`ActorEntity`].
//!
//! - [`entity`]: the `ActorEntity` contract.
//! - [`message`]: requests and the row [`Filter`].
//! - [`actor`]: the run loop.
//! - [`client`] / [`client_trait`]: the generic client and the typed-client trait.
//! - [`mock`]: test doubles.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
