/// A customer order for pickup at one store.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Lifecycle transitions ([`OrderAction`](crate::order_actor::OrderAction))
use crate::model::{table_id, ChatId, MenuItemId, StoreId};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

table_id!(
    /// Type-safe identifier for Orders.
    OrderId,
    "order"
);

/// Lifecycle status.
///
/// ```text
/// Created --claim--> Accepted --complete--> Completed
/// Created --expire--> Cancelled --retry--> Created
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Created,
    Accepted,
    Completed,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Sbp,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Card, PaymentMethod::Sbp];

    /// Wire token used in callbacks.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Sbp => "sbp",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => f.write_str("card"),
            PaymentMethod::Sbp => f.write_str("SBP"),
        }
    }
}

/// How the customer chose the pickup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupOption {
    Asap,
    InMinutes(u32),
    Custom,
}

impl fmt::Display for PickupOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickupOption::Asap => f.write_str("ASAP"),
            PickupOption::InMinutes(m) => write!(f, "in {m} min"),
            PickupOption::Custom => f.write_str("CUSTOM"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Chat of the customer who placed the order.
    pub client: ChatId,
    pub store_id: StoreId,
    /// Item id to quantity. Never empty, no zero quantities.
    pub items: BTreeMap<MenuItemId, u32>,
    /// Priced from the catalog at creation, never recomputed.
    pub total_price: BigDecimal,
    pub status: OrderStatus,
    /// Start of the acceptance window. Reset on retry.
    pub created_at: DateTime<Utc>,
    pub assigned_staff: Option<ChatId>,
    pub target_ready_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub pickup_option: PickupOption,
    /// Set once the assigned staff member got the due-soon reminder.
    pub reminder_sent: bool,
}

impl Order {
    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.items.values().sum()
    }
}

/// Payload for placing an order. Prices are not part of it: the order actor reads them from the
/// menu when the row is created.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub client: ChatId,
    pub store_id: StoreId,
    pub items: BTreeMap<MenuItemId, u32>,
    pub pickup_option: PickupOption,
    pub target_ready_at: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
}
