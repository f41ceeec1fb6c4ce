use crate::model::table_id;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

table_id!(
    /// Type-safe identifier for Stores.
    StoreId,
    "store"
);

/// A pickup location. Catalog data, read-only from the chat flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl Store {
    /// Working hours as `HH:MM - HH:MM`.
    pub fn working_hours(&self) -> String {
        format!(
            "{} - {}",
            self.opening_time.format("%H:%M"),
            self.closing_time.format("%H:%M")
        )
    }
}

/// Payload for creating a store.
#[derive(Debug, Clone)]
pub struct StoreCreate {
    pub name: String,
    pub address: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_hours_format() {
        let store = Store {
            id: StoreId(1),
            name: "Corner".into(),
            address: "Main st. 1".into(),
            opening_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        };
        assert_eq!(store.working_hours(), "08:00 - 22:30");
        assert_eq!(store.id.to_string(), "store_1");
    }
}
