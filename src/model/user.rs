use crate::model::table_id;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External chat identity assigned by the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ChatId)
    }
}

table_id!(
    /// Type-safe identifier for Users.
    UserId,
    "user"
);

/// A customer, registered on first contact.
///
/// Rows are immutable once created: the user table has no actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub display_name: String,
}

/// Payload for registering a user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub display_name: String,
}
