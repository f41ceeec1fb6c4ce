//! # Menu Actor
//!
//! Owns the menu item table. Every item belongs to exactly one store, checked against the store
//! table when the item is created (the actor's context is a [`StoreClient`]).
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`MenuItem`](crate::model::MenuItem)
//! - [`error`] - [`MenuError`]
//! - [`actions`] - [`MenuAction`], catalog maintenance
//!
//! ## Usage
//!
//! ```rust
//! use pickup_bot::clients::{MenuClient, StoreClient};
//! use pickup_bot::model::{MenuItemCreate, StoreCreate};
//! use pickup_bot::{menu_actor, store_actor};
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveTime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (store_actor, store_client) = store_actor::new();
//!     let store_client = StoreClient::new(store_client);
//!     tokio::spawn(store_actor.run(()));
//!
//!     let (menu_actor, menu_client) = menu_actor::new();
//!     let menu_client = MenuClient::new(menu_client);
//!     tokio::spawn(menu_actor.run(store_client.clone()));
//!
//!     let store_id = store_client
//!         .create_store(StoreCreate {
//!             name: "Corner".into(),
//!             address: "Main st. 1".into(),
//!             opening_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
//!             closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
//!         })
//!         .await?;
//!     let latte = menu_client
//!         .create_item(MenuItemCreate {
//!             store_id,
//!             name: "Latte".into(),
//!             price: BigDecimal::from(100),
//!         })
//!         .await?;
//!     menu_client.set_price(latte, BigDecimal::from(120)).await?;
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::framework::{ResourceActor, ResourceClient};
use crate::model::MenuItem;

/// Creates a new Menu actor and its client. Run it with a
/// [`StoreClient`](crate::clients::StoreClient) as context.
pub fn new() -> (ResourceActor<MenuItem>, ResourceClient<MenuItem>) {
    ResourceActor::new(32)
}
