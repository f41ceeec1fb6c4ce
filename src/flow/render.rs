//! Text building shared by the flows and the notifier.

use crate::clients::MenuClient;
use crate::framework::ActorClient;
use crate::model::{MenuItemId, Order};
use bigdecimal::BigDecimal;
use chrono::FixedOffset;
use std::collections::BTreeMap;

use super::time::local_hhmm;

pub fn money(amount: &BigDecimal) -> String {
    amount.with_scale(2).to_string()
}

/// `Latte x2` per line. Items the menu no longer knows are shown by id.
pub async fn item_lines(menu: &MenuClient, items: &BTreeMap<MenuItemId, u32>) -> Vec<String> {
    let mut lines = Vec::with_capacity(items.len());
    for (id, qty) in items {
        let name = match menu.get(*id).await {
            Ok(Some(item)) => item.name,
            _ => id.to_string(),
        };
        lines.push(format!("{name} x{qty}"));
    }
    lines
}

/// `#12, pickup 14:30` or `#12, pickup ASAP` when no target time was recorded.
pub fn order_heading(order: &Order, offset: FixedOffset) -> String {
    match order.target_ready_at {
        Some(at) => format!("#{}, pickup {}", order.id.0, local_hhmm(at, offset)),
        None => format!("#{}, pickup {}", order.id.0, order.pickup_option),
    }
}

/// Heading, item lines and total.
pub async fn order_details(menu: &MenuClient, order: &Order, offset: FixedOffset) -> String {
    let mut text = format!("Order {}", order_heading(order, offset));
    for line in item_lines(menu, &order.items).await {
        text.push_str("\n  ");
        text.push_str(&line);
    }
    text.push_str(&format!("\nTotal: {}", money(&order.total_price)));
    text
}
