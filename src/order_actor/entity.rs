//! [`ActorEntity`] implementation for [`Order`].
//!
//! Creation validates the item map, then `on_create` reads every item from the menu to check
//! it belongs to the order's store and to compute the total from current prices. After that the
//! row only changes through [`Order::transition`].

use super::actions::OrderAction;
use super::OrderContext;
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, PaymentStatus};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use tracing::debug;

impl Order {
    /// Applies one lifecycle transition at time `now`.
    ///
    /// On error the row may be left partially modified; the actor discards it.
    pub fn transition(&mut self, action: OrderAction, now: DateTime<Utc>) -> Result<(), OrderError> {
        match action {
            OrderAction::Claim { staff, store_id } => {
                if self.store_id != store_id {
                    debug!(order_id = %self.id, order_store = %self.store_id, staff_store = %store_id, "Claim from another store");
                    return Err(OrderError::Validation(
                        "This order belongs to another store.".into(),
                    ));
                }
                self.expect_status(OrderStatus::Created)?;
                self.status = OrderStatus::Accepted;
                self.assigned_staff = Some(staff);
            }
            OrderAction::Complete { staff } => {
                self.expect_status(OrderStatus::Accepted)?;
                if self.assigned_staff != Some(staff) {
                    debug!(order_id = %self.id, %staff, "Completion by unassigned staff");
                    return Err(OrderError::Validation(
                        "This order is assigned to someone else.".into(),
                    ));
                }
                self.status = OrderStatus::Completed;
            }
            OrderAction::Retry { client } => {
                if self.client != client {
                    debug!(order_id = %self.id, %client, "Retry by another customer");
                    return Err(OrderError::Validation("This order is not yours.".into()));
                }
                self.expect_status(OrderStatus::Cancelled)?;
                self.status = OrderStatus::Created;
                self.created_at = now;
                self.assigned_staff = None;
            }
            OrderAction::Expire { cutoff } => {
                self.expect_status(OrderStatus::Created)?;
                if self.created_at >= cutoff {
                    return Err(OrderError::NotDue(self.id));
                }
                self.status = OrderStatus::Cancelled;
            }
            OrderAction::MarkReminded { due_before } => {
                self.expect_status(OrderStatus::Accepted)?;
                match self.target_ready_at {
                    Some(target) if target <= due_before && !self.reminder_sent => {
                        self.reminder_sent = true;
                    }
                    _ => return Err(OrderError::NotDue(self.id)),
                }
            }
        }
        Ok(())
    }

    fn expect_status(&self, expected: OrderStatus) -> Result<(), OrderError> {
        if self.status != expected {
            return Err(OrderError::Conflict {
                id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.items.is_empty() {
            return Err(OrderError::Validation("Your cart is empty.".into()));
        }
        if let Some((item, _)) = params.items.iter().find(|(_, qty)| **qty == 0) {
            debug!(%item, "Zero quantity");
            return Err(OrderError::Validation(
                "Every item needs a quantity of at least one.".into(),
            ));
        }
        Ok(Self {
            id,
            client: params.client,
            store_id: params.store_id,
            items: params.items,
            total_price: BigDecimal::zero(),
            status: OrderStatus::Created,
            created_at: DateTime::<Utc>::MIN_UTC,
            assigned_staff: None,
            target_ready_at: params.target_ready_at,
            payment_status: PaymentStatus::Paid,
            payment_method: params.payment_method,
            pickup_option: params.pickup_option,
            reminder_sent: false,
        })
    }

    /// Prices the order from the current menu and stamps `created_at`.
    ///
    /// One menu `Get` per line, in item id order.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        let mut total = BigDecimal::zero();
        for (item_id, qty) in &self.items {
            let item = ctx
                .menu
                .get(*item_id)
                .await
                .map_err(|e| OrderError::Unavailable(e.to_string()))?
                .ok_or_else(|| {
                    debug!(%item_id, "Unknown item");
                    OrderError::Validation("An item in your cart is no longer on the menu.".into())
                })?;
            if item.store_id != self.store_id {
                debug!(item_id = %item.id, item_store = %item.store_id, order_store = %self.store_id, "Item from another store");
                return Err(OrderError::Validation(
                    "An item in your cart is sold at another store.".into(),
                ));
            }
            total += &item.price * BigDecimal::from(*qty);
        }
        debug!(order_id = %self.id, %total, "Priced order");
        self.total_price = total;
        self.created_at = ctx.clock.now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<Order, Self::Error> {
        self.transition(action, ctx.clock.now())?;
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChatId, MenuItemId, PaymentMethod, PickupOption, StoreId};
    use chrono::{Duration, TimeZone};
    use std::collections::BTreeMap;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn created_order() -> Order {
        let mut order = Order::from_create_params(
            OrderId(1),
            OrderCreate {
                client: ChatId(100),
                store_id: StoreId(1),
                items: BTreeMap::from([(MenuItemId(1), 2)]),
                pickup_option: PickupOption::Asap,
                target_ready_at: Some(t0() + Duration::minutes(15)),
                payment_method: PaymentMethod::Card,
            },
        )
        .unwrap();
        order.created_at = t0();
        order
    }

    fn claim() -> OrderAction {
        OrderAction::Claim {
            staff: ChatId(7),
            store_id: StoreId(1),
        }
    }

    #[test]
    fn test_rejects_empty_and_zero_quantity_items() {
        let mut params = OrderCreate {
            client: ChatId(100),
            store_id: StoreId(1),
            items: BTreeMap::new(),
            pickup_option: PickupOption::Asap,
            target_ready_at: None,
            payment_method: PaymentMethod::Sbp,
        };
        assert!(matches!(
            Order::from_create_params(OrderId(1), params.clone()),
            Err(OrderError::Validation(_))
        ));

        params.items.insert(MenuItemId(3), 0);
        assert!(matches!(
            Order::from_create_params(OrderId(1), params),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_happy_path_follows_legal_graph() {
        let mut order = created_order();
        assert_eq!(order.payment_status, PaymentStatus::Paid);

        order.transition(claim(), t0()).unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.assigned_staff, Some(ChatId(7)));

        order
            .transition(OrderAction::Complete { staff: ChatId(7) }, t0())
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn test_second_claim_conflicts() {
        let mut order = created_order();
        order.transition(claim(), t0()).unwrap();

        let err = order
            .transition(
                OrderAction::Claim {
                    staff: ChatId(8),
                    store_id: StoreId(1),
                },
                t0(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::Conflict {
                id: OrderId(1),
                status: OrderStatus::Accepted
            }
        );
    }

    #[test]
    fn test_claim_from_other_store_is_rejected() {
        let mut order = created_order();
        let err = order
            .transition(
                OrderAction::Claim {
                    staff: ChatId(7),
                    store_id: StoreId(2),
                },
                t0(),
            )
            .unwrap_err();
        // row ids stay out of the text shown in the chat
        assert_eq!(
            err,
            OrderError::Validation("This order belongs to another store.".into())
        );
        assert_eq!(order.status, OrderStatus::Created);
    }

    #[test]
    fn test_complete_requires_assigned_staff_and_accepted() {
        let mut order = created_order();
        assert!(matches!(
            order.transition(OrderAction::Complete { staff: ChatId(7) }, t0()),
            Err(OrderError::Conflict { .. })
        ));

        order.transition(claim(), t0()).unwrap();
        assert!(matches!(
            order.transition(OrderAction::Complete { staff: ChatId(8) }, t0()),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn test_expire_only_old_created_orders() {
        let mut order = created_order();

        // exactly at the cutoff is not older than the threshold
        assert_eq!(
            order.transition(OrderAction::Expire { cutoff: t0() }, t0()),
            Err(OrderError::NotDue(OrderId(1)))
        );

        let cutoff = t0() + Duration::seconds(1);
        order.transition(OrderAction::Expire { cutoff }, t0()).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        let mut accepted = created_order();
        accepted.transition(claim(), t0()).unwrap();
        assert!(matches!(
            accepted.transition(OrderAction::Expire { cutoff }, t0()),
            Err(OrderError::Conflict { .. })
        ));
    }

    #[test]
    fn test_retry_resets_created_at() {
        let mut order = created_order();
        order
            .transition(OrderAction::Expire { cutoff: t0() + Duration::minutes(16) }, t0())
            .unwrap();

        let later = t0() + Duration::minutes(20);
        assert!(matches!(
            order.transition(OrderAction::Retry { client: ChatId(5) }, later),
            Err(OrderError::Validation(_))
        ));

        order
            .transition(OrderAction::Retry { client: ChatId(100) }, later)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.created_at, later);

        assert!(matches!(
            order.transition(OrderAction::Retry { client: ChatId(100) }, later),
            Err(OrderError::Conflict { .. })
        ));
    }

    #[test]
    fn test_reminder_fires_once_when_due() {
        let mut order = created_order();
        order.transition(claim(), t0()).unwrap();

        let early = OrderAction::MarkReminded {
            due_before: t0() + Duration::minutes(5),
        };
        assert_eq!(order.transition(early, t0()), Err(OrderError::NotDue(OrderId(1))));

        let due = OrderAction::MarkReminded {
            due_before: t0() + Duration::minutes(15),
        };
        order.transition(due.clone(), t0()).unwrap();
        assert!(order.reminder_sent);
        assert!(order.transition(due, t0()).is_err());
    }
}
