//! Staff flow: shift start and stop, the store's pending orders, claiming and issuing.

use super::event::{Callback, ChatIdentity};
use super::render::order_details;
use super::reply::Reply;
use super::Services;
use crate::error::FlowError;
use crate::model::{ChatId, OrderId, Staff, StaffStatus};
use crate::notify::OrderEvent;
use crate::order_actor::OrderError;
use crate::session::{Cart, FlowState, Session};
use tracing::info;

pub struct StaffFlow {
    services: Services,
}

impl StaffFlow {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// `/start_session`: asks for confirmation before going on shift.
    pub async fn shift_start_request(
        &self,
        chat: &ChatIdentity,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let staff = self.staff(chat.chat_id).await?;
        let store = self.store_name(&staff).await?;
        enter(session, FlowState::ShiftStartConfirm);
        Ok(vec![Reply::text(format!("Start your shift at {store}?"))
            .button("Yes, start", Callback::StartSession(chat.chat_id))
            .button("Cancel", Callback::Cancel)])
    }

    /// Goes on shift and lists pending orders. Also serves as "refresh" while on shift.
    ///
    /// The button carries the chat it was issued to; a forwarded button is refused.
    pub async fn shift_start_confirm(
        &self,
        chat: &ChatIdentity,
        target: ChatId,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        if target != chat.chat_id {
            return Err(FlowError::Validation("This button is not meant for you.".into()));
        }
        let mut staff = self.staff(chat.chat_id).await?;
        if session.state != FlowState::ShiftStartConfirm && !staff.is_active() {
            return Err(FlowError::Validation(
                "Send /start_session to start a shift.".into(),
            ));
        }

        if !staff.is_active() {
            staff = self
                .services
                .staff
                .set_status(staff.id, StaffStatus::Active)
                .await?;
            info!(staff_id = %staff.id, store_id = %staff.store_id, "Shift started");
        }

        enter(session, FlowState::IncomingOrder);
        Ok(vec![self.pending_reply(&staff).await?])
    }

    /// `/close_session`: asks for confirmation before going off shift.
    pub async fn shift_stop_request(
        &self,
        chat: &ChatIdentity,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let staff = self.staff(chat.chat_id).await?;
        if !staff.is_active() {
            return Err(FlowError::Validation("You are not on shift.".into()));
        }
        enter(session, FlowState::ShiftStopConfirm);
        Ok(vec![Reply::text("End your shift?")
            .button("Yes, end shift", Callback::StopSession)
            .button("Back to orders", Callback::StartSession(chat.chat_id))])
    }

    pub async fn shift_stop(
        &self,
        chat: &ChatIdentity,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let staff = self.staff(chat.chat_id).await?;
        if staff.is_active() {
            self.services
                .staff
                .set_status(staff.id, StaffStatus::Inactive)
                .await?;
            info!(staff_id = %staff.id, "Shift ended");
        }
        enter(session, FlowState::Idle);
        Ok(vec![Reply::text("Shift ended. See you next time!")])
    }

    /// Claims a pending order. Exactly one of several concurrent claims wins; the others are
    /// told and shown the refreshed list.
    pub async fn claim(
        &self,
        chat: &ChatIdentity,
        order_id: OrderId,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let staff = self.staff(chat.chat_id).await?;
        let order = match self.services.orders.claim_order(order_id, &staff).await {
            Ok(order) => order,
            Err(OrderError::Conflict { id, status }) => {
                info!(order_id = %id, %status, staff = %chat.chat_id, "Claim lost");
                enter(session, FlowState::IncomingOrder);
                return Ok(vec![
                    Reply::text(format!(
                        "Order #{} was already handled by someone else.",
                        id.0
                    )),
                    self.pending_reply(&staff).await?,
                ]);
            }
            Err(e) => return Err(e.into()),
        };
        info!(order_id = %order.id, staff = %chat.chat_id, "Order claimed");

        self.services
            .notifier
            .dispatch(&OrderEvent::Claimed(order.clone()))
            .await;

        enter(session, FlowState::IssueOrder(order.id));
        let details = order_details(
            &self.services.menu,
            &order,
            self.services.settings.offset,
        )
        .await;
        Ok(vec![Reply::text(format!("You accepted the order.\n{details}"))
            .button("Order ready", Callback::IssueOrder(order.id))])
    }

    /// Hands a claimed order over to the customer.
    pub async fn issue(
        &self,
        chat: &ChatIdentity,
        order_id: OrderId,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let order = self
            .services
            .orders
            .complete_order(order_id, chat.chat_id)
            .await?;
        info!(order_id = %order.id, staff = %chat.chat_id, "Order issued");

        self.services
            .notifier
            .dispatch(&OrderEvent::Ready(order.clone()))
            .await;

        enter(session, FlowState::IncomingOrder);
        Ok(vec![Reply::text(format!(
            "Order #{} is marked ready. The customer has been notified.",
            order.id.0
        ))
        .button("Back to orders", Callback::StartSession(chat.chat_id))])
    }

    async fn staff(&self, chat_id: ChatId) -> Result<Staff, FlowError> {
        self.services
            .staff
            .find_by_chat(chat_id)
            .await?
            .ok_or_else(|| {
                FlowError::Validation("Access denied: this chat is not registered as staff.".into())
            })
    }

    async fn store_name(&self, staff: &Staff) -> Result<String, FlowError> {
        use crate::framework::ActorClient;
        Ok(self
            .services
            .stores
            .get(staff.store_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_else(|| staff.store_id.to_string()))
    }

    /// The store's `Created` orders, oldest first, one Accept button each.
    async fn pending_reply(&self, staff: &Staff) -> Result<Reply, FlowError> {
        let pending = self
            .services
            .orders
            .pending_for_store(staff.store_id)
            .await?;
        let offset = self.services.settings.offset;

        let mut reply = Reply::default();
        if pending.is_empty() {
            reply.text = "No pending orders.".into();
        } else {
            let mut text = format!("Pending orders ({}):", pending.len());
            for order in &pending {
                text.push_str("\n\n");
                text.push_str(&order_details(&self.services.menu, order, offset).await);
                reply = reply.button(format!("Accept #{}", order.id.0), Callback::ClaimOrder(order.id));
            }
            reply.text = text;
        }
        Ok(reply
            .button("Refresh", Callback::StartSession(staff.chat_id))
            .button("End shift", Callback::StopSession))
    }
}

fn enter(session: &mut Session, state: FlowState) {
    session.state = state;
    session.cart = Cart::default();
}
