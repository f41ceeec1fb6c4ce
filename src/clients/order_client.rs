//! # Order Client
//!
//! The order lifecycle API used by the flows and the sweeper. Every mutating call is one
//! [`OrderAction`] on the order actor, so its status precondition is checked and applied
//! atomically.
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{ChatId, Order, OrderCreate, OrderId, OrderStatus, Staff, StoreId};
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Places an order. Items are validated and priced by the order actor against the menu.
    #[instrument(skip(self, params), fields(client = %params.client, store_id = %params.store_id))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!(?params, "create_order called");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        let order = self
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))?;
        info!(order_id = %id, total = %order.total_price, "Order created");
        Ok(order)
    }

    /// `Created -> Accepted` for a staff member on shift at the order's store.
    #[instrument(skip(self, staff), fields(staff = %staff.chat_id))]
    pub async fn claim_order(&self, id: OrderId, staff: &Staff) -> Result<Order, OrderError> {
        if !staff.is_active() {
            debug!(staff_id = %staff.id, order_id = %id, "Claim while off shift");
            return Err(OrderError::Validation("You are not on shift.".into()));
        }
        self.act(
            id,
            OrderAction::Claim {
                staff: staff.chat_id,
                store_id: staff.store_id,
            },
        )
        .await
    }

    /// `Accepted -> Completed` by the assigned staff member.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, id: OrderId, staff: ChatId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::Complete { staff }).await
    }

    /// `Cancelled -> Created` by the customer, restarting the acceptance window.
    #[instrument(skip(self))]
    pub async fn retry_order(&self, id: OrderId, client: ChatId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::Retry { client }).await
    }

    /// Cancels every `Created` order older than `threshold` and returns them.
    ///
    /// Candidates are read first, then each one is expired individually. An order claimed or
    /// retried in between fails its own `Expire` and is left alone.
    #[instrument(skip(self))]
    pub async fn sweep_expired(
        &self,
        now: DateTime<Utc>,
        threshold: Duration,
    ) -> Result<Vec<Order>, OrderError> {
        let cutoff = now - threshold;
        let candidates = self
            .query(Filter::new(move |o: &Order| {
                o.status == OrderStatus::Created && o.created_at < cutoff
            }))
            .await?;

        let mut expired = Vec::with_capacity(candidates.len());
        for order in candidates {
            match self.act(order.id, OrderAction::Expire { cutoff }).await {
                Ok(order) => expired.push(order),
                Err(OrderError::Conflict { .. } | OrderError::NotDue(_)) => {
                    debug!(order_id = %order.id, "Changed before it could expire");
                }
                Err(e) => warn!(order_id = %order.id, error = %e, "Expire failed"),
            }
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "Expired orders");
        }
        Ok(expired)
    }

    /// `Created` orders of one store, oldest first.
    #[instrument(skip(self))]
    pub async fn pending_for_store(&self, store_id: StoreId) -> Result<Vec<Order>, OrderError> {
        self.query(Filter::new(move |o: &Order| {
            o.store_id == store_id && o.status == OrderStatus::Created
        }))
        .await
    }

    /// Accepted orders whose target time falls within `lead` of `now` and that have not been
    /// reminded yet. Each returned order is flagged so it is never returned again.
    #[instrument(skip(self))]
    pub async fn due_for_reminder(
        &self,
        now: DateTime<Utc>,
        lead: Duration,
    ) -> Result<Vec<Order>, OrderError> {
        let due_before = now + lead;
        let candidates = self
            .query(Filter::new(move |o: &Order| {
                o.status == OrderStatus::Accepted
                    && !o.reminder_sent
                    && o.target_ready_at.is_some_and(|t| t <= due_before)
            }))
            .await?;

        let mut due = Vec::with_capacity(candidates.len());
        for order in candidates {
            match self.act(order.id, OrderAction::MarkReminded { due_before }).await {
                Ok(order) => due.push(order),
                Err(e) => debug!(order_id = %order.id, error = %e, "Reminder skipped"),
            }
        }
        Ok(due)
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from(e)
    }
}
