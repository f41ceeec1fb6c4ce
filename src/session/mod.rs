//! Per-chat conversation state: where the chat is in its flow and what is in its cart.
//!
//! Sessions are ephemeral. They are created on store selection or shift start, cleared on
//! order finalization, cancel or shift stop, and dropped once idle for too long.

pub mod store;

pub use store::{InMemorySessionStore, SessionStore};

use crate::model::{MenuItemId, OrderId, PickupOption, StoreId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position in the customer or staff flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowState {
    /// No flow in progress.
    #[default]
    Idle,
    SelectStore,
    /// Browsing the menu, viewing or editing the cart.
    SelectItems,
    TimeWindow,
    CustomTimeInput,
    PaymentMethod,
    /// Staff asked to start a shift and must confirm.
    ShiftStartConfirm,
    /// Staff on shift, looking at the store's pending orders.
    IncomingOrder,
    /// Staff holding a claimed order until it is issued.
    IssueOrder(OrderId),
    /// Staff asked to stop the shift and must confirm.
    ShiftStopConfirm,
}

impl FlowState {
    pub fn is_customer(&self) -> bool {
        matches!(
            self,
            FlowState::SelectStore
                | FlowState::SelectItems
                | FlowState::TimeWindow
                | FlowState::CustomTimeInput
                | FlowState::PaymentMethod
        )
    }

    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            FlowState::ShiftStartConfirm
                | FlowState::IncomingOrder
                | FlowState::IssueOrder(_)
                | FlowState::ShiftStopConfirm
        )
    }
}

/// Items being collected for one store, plus the pickup choice once made.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub store_id: Option<StoreId>,
    /// Item to quantity. A key is removed when its last unit is; quantities are never 0.
    pub items: BTreeMap<MenuItemId, u32>,
    pub pickup: Option<PickupOption>,
    pub target_ready_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn for_store(store_id: StoreId) -> Self {
        Self {
            store_id: Some(store_id),
            ..Self::default()
        }
    }

    /// Adds one unit and returns the new quantity.
    pub fn add(&mut self, item: MenuItemId) -> u32 {
        let qty = self.items.entry(item).or_insert(0);
        *qty += 1;
        *qty
    }

    /// Removes one unit. Returns `false` when the item was not in the cart.
    pub fn remove_one(&mut self, item: MenuItemId) -> bool {
        match self.items.get_mut(&item) {
            Some(qty) if *qty > 1 => {
                *qty -= 1;
                true
            }
            Some(_) => {
                self.items.remove(&item);
                true
            }
            None => false,
        }
    }

    pub fn unit_count(&self) -> u32 {
        self.items.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear_pickup(&mut self) {
        self.pickup = None;
        self.target_ready_at = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub state: FlowState,
    pub cart: Cart,
    /// Last time an update for this chat was handled.
    pub touched_at: DateTime<Utc>,
}

impl Session {
    pub fn new(state: FlowState, now: DateTime<Utc>) -> Self {
        Self {
            state,
            cart: Cart::default(),
            touched_at: now,
        }
    }
}
