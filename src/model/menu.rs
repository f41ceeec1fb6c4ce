use crate::model::{table_id, StoreId};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

table_id!(
    /// Type-safe identifier for MenuItems.
    MenuItemId,
    "menu_item"
);

/// A purchasable item of exactly one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub store_id: StoreId,
    pub name: String,
    pub price: BigDecimal,
}

/// Payload for adding an item to a store's menu.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub store_id: StoreId,
    pub name: String,
    pub price: BigDecimal,
}
