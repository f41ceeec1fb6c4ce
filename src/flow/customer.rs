//! Customer flow: store selection, cart building, pickup time, payment and finalization.

use super::event::{Callback, ChatIdentity, TimeChoice};
use super::render::{item_lines, money};
use super::reply::{Button, Reply};
use super::time::{local_hhmm, resolve_custom_time};
use super::Services;
use crate::error::FlowError;
use crate::framework::ActorClient;
use crate::model::{
    MenuItem, MenuItemId, OrderCreate, OrderId, PaymentMethod, PickupOption, Store, StoreId,
    UserCreate,
};
use crate::notify::OrderEvent;
use crate::session::{Cart, FlowState, Session};
use bigdecimal::{BigDecimal, Zero};
use chrono::Duration;
use tracing::info;

pub struct CustomerFlow {
    services: Services,
}

impl CustomerFlow {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// `/start`: registers the chat on first contact and offers store selection.
    pub async fn start(
        &self,
        chat: &ChatIdentity,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let display_name = match chat.display_name.trim() {
            "" => chat
                .username
                .clone()
                .unwrap_or_else(|| chat.chat_id.to_string()),
            name => name.to_string(),
        };
        let user = self
            .services
            .users
            .register(UserCreate {
                chat_id: chat.chat_id,
                username: chat.username.clone(),
                display_name,
            })
            .await?;

        reset(session, FlowState::SelectStore);
        Ok(vec![Reply::text(format!(
            "Hello, {}! Order ahead and pick up without waiting in line.",
            user.display_name
        ))
        .button("Choose a store", Callback::ChooseStore)])
    }

    /// `/new` or "Choose a store": every store with its address and hours.
    ///
    /// Stores with a staff member on shift are tagged as open. The tag is informational only.
    pub async fn list_stores(&self, session: &mut Session) -> Result<Vec<Reply>, FlowError> {
        let stores = self.services.stores.list_stores().await?;
        if stores.is_empty() {
            reset(session, FlowState::Idle);
            return Ok(vec![Reply::text("No stores are available right now.")]);
        }

        let mut text = String::from("Choose a store:");
        let mut reply = Reply::default();
        for store in &stores {
            let open = !self
                .services
                .staff
                .active_for_store(store.id)
                .await?
                .is_empty();
            text.push_str(&format!(
                "\n\n{}{}\n{}\nHours: {}",
                store.name,
                if open { " (open)" } else { "" },
                store.address,
                store.working_hours()
            ));
            reply = reply.button(store.name.clone(), Callback::SelectStore(store.id));
        }
        reply.text = text;

        reset(session, FlowState::SelectStore);
        Ok(vec![reply])
    }

    /// Starts a fresh cart for the store and shows its menu.
    pub async fn select_store(
        &self,
        store_id: StoreId,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let store = self.store(store_id).await?;
        session.state = FlowState::SelectItems;
        session.cart = Cart::for_store(store_id);
        Ok(vec![self.menu_reply(&store, &session.cart).await?])
    }

    /// Adds one unit. From an idle chat (a menu button outliving its session) the cart is
    /// rebuilt for the item's store.
    pub async fn add_item(
        &self,
        item_id: MenuItemId,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let item = self.item(item_id).await?;

        if session.state == FlowState::Idle || session.cart.store_id.is_none() {
            session.cart = Cart::for_store(item.store_id);
        }
        if session.cart.store_id != Some(item.store_id) {
            return Err(FlowError::Validation(format!(
                "{} is sold at another store. Finish or cancel this order first.",
                item.name
            )));
        }

        session.cart.add(item.id);
        session.cart.clear_pickup();
        session.state = FlowState::SelectItems;

        let store = self.store(item.store_id).await?;
        Ok(vec![
            Reply::text(format!("{} added to the cart.", item.name)),
            self.menu_reply(&store, &session.cart).await?,
        ])
    }

    /// Cart lines at current menu prices.
    pub async fn view_cart(&self, session: &mut Session) -> Result<Vec<Reply>, FlowError> {
        session.state = FlowState::SelectItems;
        session.cart.clear_pickup();
        if session.cart.is_empty() {
            return self.empty_cart(session).await;
        }

        let (lines, total) = self.priced_lines(&session.cart).await?;
        let text = format!("Your cart:\n{}\n\nTotal: {}", lines.join("\n"), money(&total));
        Ok(vec![Reply::text(text)
            .button("Checkout", Callback::Checkout)
            .button("Remove items", Callback::EditCart)
            .button("Menu", Callback::BackToMenu)])
    }

    pub async fn edit_cart(&self, session: &mut Session) -> Result<Vec<Reply>, FlowError> {
        session.state = FlowState::SelectItems;
        session.cart.clear_pickup();
        if session.cart.is_empty() {
            return self.empty_cart(session).await;
        }
        Ok(vec![self.edit_reply(&session.cart).await?])
    }

    /// Removes one unit; the last unit removes the line.
    pub async fn remove_item(
        &self,
        item_id: MenuItemId,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        if !session.cart.remove_one(item_id) {
            return Err(FlowError::Validation("That item is not in your cart.".into()));
        }
        self.edit_cart(session).await
    }

    pub async fn back_to_menu(&self, session: &mut Session) -> Result<Vec<Reply>, FlowError> {
        let store_id = self.cart_store(session)?;
        let store = self.store(store_id).await?;
        session.state = FlowState::SelectItems;
        session.cart.clear_pickup();
        Ok(vec![self.menu_reply(&store, &session.cart).await?])
    }

    /// Moves to pickup time selection.
    pub fn checkout(&self, session: &mut Session) -> Result<Vec<Reply>, FlowError> {
        if session.cart.is_empty() {
            return Err(FlowError::Validation("Your cart is empty.".into()));
        }
        session.state = FlowState::TimeWindow;

        let offsets = self
            .services
            .settings
            .fixed_offsets
            .iter()
            .map(|m| Button::new(format!("{m} min"), Callback::SetTime(TimeChoice::Minutes(*m))))
            .collect();
        Ok(vec![Reply::text("When would you like to pick up your order?")
            .button("As soon as possible", Callback::SetTime(TimeChoice::Asap))
            .row(offsets)
            .button("Other time", Callback::CustomTime)
            .button("Cancel order", Callback::Cancel)])
    }

    pub fn set_time(
        &self,
        choice: TimeChoice,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let settings = &self.services.settings;
        let now = self.services.clock.now();
        let (pickup, target) = match choice {
            TimeChoice::Asap => (PickupOption::Asap, now + settings.asap),
            TimeChoice::Minutes(m) if settings.fixed_offsets.contains(&m) => (
                PickupOption::InMinutes(m),
                now + Duration::minutes(i64::from(m)),
            ),
            TimeChoice::Minutes(m) => {
                return Err(FlowError::Validation(format!(
                    "Pickup in {m} minutes is not offered. Choose one of the buttons."
                )))
            }
        };
        session.cart.pickup = Some(pickup);
        session.cart.target_ready_at = Some(target);
        session.state = FlowState::PaymentMethod;
        Ok(vec![self.payment_prompt(session)])
    }

    pub fn custom_time_prompt(&self, session: &mut Session) -> Vec<Reply> {
        session.state = FlowState::CustomTimeInput;
        vec![Reply::text("Enter the pickup time as HH:MM, for example 14:00.")
            .button("Cancel order", Callback::Cancel)]
    }

    /// Parses a typed `HH:MM`. Bad input re-prompts and leaves the state unchanged.
    pub fn custom_time_text(
        &self,
        text: &str,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let settings = &self.services.settings;
        let target = resolve_custom_time(text, self.services.clock.now(), settings.offset)?;
        session.cart.pickup = Some(PickupOption::Custom);
        session.cart.target_ready_at = Some(target);
        session.state = FlowState::PaymentMethod;
        Ok(vec![
            Reply::text(format!("Pickup at {} accepted.", local_hhmm(target, settings.offset))),
            self.payment_prompt(session),
        ])
    }

    /// Simulated payment, then order creation.
    ///
    /// On success the session is cleared and the store's staff are notified. If the order
    /// cannot be created the session is kept so the customer can try again.
    pub async fn pay(
        &self,
        chat: &ChatIdentity,
        method: PaymentMethod,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let store_id = self.cart_store(session)?;
        let pickup = session.cart.pickup.ok_or_else(|| {
            FlowError::Validation("Choose a pickup time first.".into())
        })?;

        let delay = self.services.settings.payment_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let order = self
            .services
            .orders
            .create_order(OrderCreate {
                client: chat.chat_id,
                store_id,
                items: session.cart.items.clone(),
                pickup_option: pickup,
                target_ready_at: session.cart.target_ready_at,
                payment_method: method,
            })
            .await?;
        info!(order_id = %order.id, client = %chat.chat_id, "Order placed");

        reset(session, FlowState::Idle);
        self.services
            .notifier
            .dispatch(&OrderEvent::Created(order.clone()))
            .await;

        let when = match order.target_ready_at {
            Some(at) => local_hhmm(at, self.services.settings.offset),
            None => order.pickup_option.to_string(),
        };
        Ok(vec![
            Reply::text(format!("Payment via {method} succeeded.")),
            Reply::text(format!(
                "Order #{} placed. Total: {}. Pickup at {}.\nWe will message you once it is accepted.",
                order.id.0,
                money(&order.total_price),
                when
            )),
        ])
    }

    /// Puts an expired order back in the queue and tells the store's staff again.
    pub async fn retry(
        &self,
        chat: &ChatIdentity,
        order_id: OrderId,
    ) -> Result<Vec<Reply>, FlowError> {
        let order = self
            .services
            .orders
            .retry_order(order_id, chat.chat_id)
            .await?;
        info!(order_id = %order.id, "Order retried");
        self.services
            .notifier
            .dispatch(&OrderEvent::Created(order.clone()))
            .await;
        Ok(vec![Reply::text(format!(
            "Order #{} is back in the queue.",
            order.id.0
        ))])
    }

    /// Clears the session. Orders already placed are not touched.
    pub fn cancel(&self, session: &mut Session) -> Vec<Reply> {
        reset(session, FlowState::Idle);
        vec![Reply::text("Cancelled.")]
    }

    async fn store(&self, id: StoreId) -> Result<Store, FlowError> {
        self.services
            .stores
            .get(id)
            .await?
            .ok_or_else(|| FlowError::NotFound(id.to_string()))
    }

    async fn item(&self, id: MenuItemId) -> Result<MenuItem, FlowError> {
        self.services
            .menu
            .get(id)
            .await?
            .ok_or_else(|| FlowError::NotFound(id.to_string()))
    }

    fn cart_store(&self, session: &Session) -> Result<StoreId, FlowError> {
        session
            .cart
            .store_id
            .ok_or_else(|| FlowError::NotFound("no store selected".into()))
    }

    async fn menu_reply(&self, store: &Store, cart: &Cart) -> Result<Reply, FlowError> {
        let items = self.services.menu.items_for_store(store.id).await?;
        if items.is_empty() {
            return Ok(Reply::text(format!("{} has nothing on the menu yet.", store.name))
                .button("Choose another store", Callback::ChooseStore));
        }

        let mut text = format!("{} menu:", store.name);
        let mut reply = Reply::default();
        for item in &items {
            text.push_str(&format!("\n{}, {}", item.name, money(&item.price)));
            reply = reply.button(item.name.clone(), Callback::AddItem(item.id));
        }
        reply.text = text;

        let cart_label = match cart.unit_count() {
            0 => "Cart".to_string(),
            n => format!("Cart ({n})"),
        };
        Ok(reply
            .button(cart_label, Callback::ViewCart)
            .button("Cancel order", Callback::Cancel))
    }

    /// `Latte x2 = 200.00` per line and the total, all at current prices.
    async fn priced_lines(&self, cart: &Cart) -> Result<(Vec<String>, BigDecimal), FlowError> {
        let mut lines = Vec::with_capacity(cart.items.len());
        let mut total = BigDecimal::zero();
        for (id, qty) in &cart.items {
            match self.services.menu.get(*id).await? {
                Some(item) => {
                    let line_total = &item.price * BigDecimal::from(*qty);
                    lines.push(format!("{} x{} = {}", item.name, qty, money(&line_total)));
                    total += line_total;
                }
                None => lines.push(format!("{id} x{qty} (no longer sold)")),
            }
        }
        Ok((lines, total))
    }

    async fn edit_reply(&self, cart: &Cart) -> Result<Reply, FlowError> {
        let lines = item_lines(&self.services.menu, &cart.items).await;
        let mut reply = Reply::text("Tap an item to remove one unit:");
        for (line, id) in lines.into_iter().zip(cart.items.keys()) {
            reply = reply.button(format!("Remove {line}"), Callback::RemoveItem(*id));
        }
        Ok(reply.button("Back to cart", Callback::ViewCart))
    }

    async fn empty_cart(&self, session: &mut Session) -> Result<Vec<Reply>, FlowError> {
        let store_id = self.cart_store(session)?;
        let store = self.store(store_id).await?;
        Ok(vec![
            Reply::text("Your cart is empty."),
            self.menu_reply(&store, &session.cart).await?,
        ])
    }

    fn payment_prompt(&self, session: &Session) -> Reply {
        let when = session
            .cart
            .target_ready_at
            .map(|at| local_hhmm(at, self.services.settings.offset))
            .unwrap_or_default();
        let methods = PaymentMethod::ALL
            .into_iter()
            .map(|m| Button::new(format!("Pay by {m}"), Callback::Pay(m)))
            .collect();
        Reply::text(format!("Pickup at {when}. Choose a payment method:"))
            .row(methods)
            .button("Cancel order", Callback::Cancel)
    }
}

/// Replaces the session with an empty one in `state`.
fn reset(session: &mut Session, state: FlowState) {
    session.state = state;
    session.cart = Cart::default();
}
