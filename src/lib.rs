//! # Pickup Bot
//!
//! > **Order ahead over chat, pick up without the queue.**
//!
//! Customers pick a store, fill a cart, choose a pickup time and pay; the store's staff on shift
//! are notified, one of them accepts the order and marks it ready when it is. Orders nobody
//! accepts within the expiry window are cancelled by a background sweep, and the customer can
//! put them back in the queue.
//!
//! ## 🏗️ Design
//!
//! Every table (users, stores, menu items, staff, orders) is owned by its own
//! `ResourceActor<T>` running in a Tokio task. Reads and writes go through typed clients; state
//! changes are actor *actions* that check their precondition and apply the change in the same
//! step, so two staff members claiming one order cannot both succeed.
//!
//! ### Order lifecycle
//!
//! ```text
//! CREATED --claim--> ACCEPTED --complete--> COMPLETED
//!    |
//!    +--expire--> CANCELLED --retry--> CREATED
//! ```
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `ResourceActor<T>`, its request messages and the `MockClient` used in tests.
//! - **Key items**: [`ActorEntity`](framework::ActorEntity), [`ResourceActor`](framework::ResourceActor).
//!
//! ### 2. The Tables ([`user_actor`], [`store_actor`], [`menu_actor`], [`staff_actor`], [`order_actor`])
//! `ActorEntity` implementations: validation on create, actions and per-table errors.
//! The order state machine lives in [`order_actor`].
//!
//! ### 3. The Interface ([`clients`])
//! Domain operations such as [`OrderClient::claim_order`](clients::OrderClient::claim_order)
//! or [`OrderClient::sweep_expired`](clients::OrderClient::sweep_expired).
//!
//! ### 4. The Conversation ([`flow`], [`session`], [`notify`])
//! [`FlowRouter`](flow::FlowRouter) turns chat updates into replies using per-chat sessions;
//! [`Notifier`](notify::Notifier) pushes order events to the chats that care.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`scheduler`], [`config`])
//! [`PickupSystem`](lifecycle::PickupSystem) loads nothing on its own: it takes a
//! [`PickupConfig`](config::PickupConfig), spawns and seeds the actors and wires the flows.
//! The [`Sweeper`](scheduler::Sweeper) runs the periodic expiry and reminders.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Console transport: type `<chat_id> <input>` lines
//! RUST_LOG=info cargo run
//! 1001 /start
//! 1001 @choose_store
//! ```
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod clock;
pub mod config;
pub mod error;
pub mod flow;
pub mod framework;
pub mod lifecycle;
pub mod menu_actor;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod scheduler;
pub mod session;
pub mod staff_actor;
pub mod store_actor;
pub mod user_actor;
