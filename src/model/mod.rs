//! Row types for every table, their ids and their creation payloads.
//!
//! Each row implements [`ActorEntity`](crate::framework::ActorEntity) in its actor module.

pub mod menu;
pub mod order;
pub mod staff;
pub mod store;
pub mod user;

pub use menu::*;
pub use order::*;
pub use staff::*;
pub use store::*;
pub use user::*;

/// Declares a type-safe `u32` row id rendered as `<prefix>_<n>`.
macro_rules! table_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

pub(crate) use table_id;
