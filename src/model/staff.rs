use crate::model::{table_id, ChatId, StoreId};
use serde::{Deserialize, Serialize};
use std::fmt;

table_id!(
    /// Type-safe identifier for Staff members.
    StaffId,
    "staff"
);

/// Shift status. Only active staff are told about new orders and may claim them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffStatus {
    Active,
    Inactive,
}

impl fmt::Display for StaffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffStatus::Active => f.write_str("active"),
            StaffStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// A staff member bound to one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub chat_id: ChatId,
    pub store_id: StoreId,
    pub role: String,
    pub status: StaffStatus,
}

impl Staff {
    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }
}

/// Payload for enrolling a staff member. New staff start off shift.
#[derive(Debug, Clone)]
pub struct StaffCreate {
    pub chat_id: ChatId,
    pub store_id: StoreId,
    pub role: String,
}
