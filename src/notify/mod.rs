//! # Notification Dispatcher
//!
//! Stateless fan-out of order lifecycle events to the chats that care about them:
//!
//! | Event | Recipients |
//! |-------|------------|
//! | [`OrderEvent::Created`] | active staff of the order's store |
//! | [`OrderEvent::Expired`] | the customer, with Retry / Cancel buttons |
//! | [`OrderEvent::Claimed`] | the customer |
//! | [`OrderEvent::Ready`] | the customer |
//! | [`OrderEvent::DueSoon`] | the assigned staff member |
//!
//! Dispatch happens after the transition is stored. A failed delivery is logged and counted in
//! the [`DispatchReport`]; it never stops delivery to the other recipients and never undoes the
//! transition.

pub mod transport;

pub use transport::{ChatTransport, ConsoleTransport, DeliveryError, RecordingTransport};

use crate::clients::{MenuClient, StaffClient};
use crate::flow::event::Callback;
use crate::flow::render::{order_details, order_heading};
use crate::flow::Reply;
use crate::model::{ChatId, Order};
use chrono::FixedOffset;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    Created(Order),
    Expired(Order),
    Claimed(Order),
    Ready(Order),
    DueSoon(Order),
}

impl OrderEvent {
    pub fn order(&self) -> &Order {
        match self {
            OrderEvent::Created(o)
            | OrderEvent::Expired(o)
            | OrderEvent::Claimed(o)
            | OrderEvent::Ready(o)
            | OrderEvent::DueSoon(o) => o,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "created",
            OrderEvent::Expired(_) => "expired",
            OrderEvent::Claimed(_) => "claimed",
            OrderEvent::Ready(_) => "ready",
            OrderEvent::DueSoon(_) => "due_soon",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn ChatTransport>,
    staff: StaffClient,
    menu: MenuClient,
    offset: FixedOffset,
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        staff: StaffClient,
        menu: MenuClient,
        offset: FixedOffset,
    ) -> Self {
        Self {
            transport,
            staff,
            menu,
            offset,
        }
    }

    pub async fn dispatch(&self, event: &OrderEvent) -> DispatchReport {
        let order = event.order();
        let recipients = self.recipients(event).await;
        let message = self.message(event).await;

        let mut report = DispatchReport::default();
        for chat in recipients {
            match self.transport.send(chat, &message).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(event = event.kind(), order_id = %order.id, %chat, error = %e, "Delivery failed");
                    report.failed += 1;
                }
            }
        }
        debug!(event = event.kind(), order_id = %order.id, ?report, "Dispatched");
        report
    }

    async fn recipients(&self, event: &OrderEvent) -> Vec<ChatId> {
        match event {
            OrderEvent::Created(order) => match self.staff.active_for_store(order.store_id).await {
                Ok(staff) => staff.into_iter().map(|s| s.chat_id).collect(),
                Err(e) => {
                    warn!(order_id = %order.id, error = %e, "Could not look up staff to notify");
                    Vec::new()
                }
            },
            OrderEvent::DueSoon(order) => order.assigned_staff.into_iter().collect(),
            OrderEvent::Expired(order) | OrderEvent::Claimed(order) | OrderEvent::Ready(order) => {
                vec![order.client]
            }
        }
    }

    async fn message(&self, event: &OrderEvent) -> Reply {
        let order = event.order();
        let heading = order_heading(order, self.offset);
        match event {
            OrderEvent::Created(_) => {
                let details = order_details(&self.menu, order, self.offset).await;
                Reply::text(format!("New order!\n{details}"))
                    .button("Accept", Callback::ClaimOrder(order.id))
            }
            OrderEvent::Expired(_) => Reply::text(format!(
                "Order {heading} was not accepted in time and has been cancelled."
            ))
            .button("Retry", Callback::RetryOrder(order.id))
            .button("Cancel", Callback::Cancel),
            OrderEvent::Claimed(_) => {
                Reply::text(format!("Your order {heading} has been accepted."))
            }
            OrderEvent::Ready(_) => {
                Reply::text(format!("Your order {heading} is ready. Come and pick it up!"))
            }
            OrderEvent::DueSoon(_) => {
                Reply::text(format!("Reminder: order {heading} is due soon."))
                    .button("Order ready", Callback::IssueOrder(order.id))
            }
        }
    }
}
