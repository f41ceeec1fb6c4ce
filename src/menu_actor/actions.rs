//! Custom actions for the Menu actor.

use bigdecimal::BigDecimal;

/// Catalog maintenance on a single menu item.
#[derive(Debug, Clone)]
pub enum MenuAction {
    /// Re-price the item. Existing orders keep the total they were created with; carts pick up
    /// the new price the next time they are rendered.
    SetPrice(BigDecimal),
}
