//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient), one per table.
//!
//! Each client implements [`ActorClient`](crate::framework::ActorClient) for `get`/`query` and
//! adds the table's domain operations on top, returning the table's own error enum.

pub mod menu_client;
pub mod order_client;
pub mod staff_client;
pub mod store_client;
pub mod user_client;

pub use menu_client::*;
pub use order_client::*;
pub use staff_client::*;
pub use store_client::*;
pub use user_client::*;
