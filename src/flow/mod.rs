//! # Conversation Flows
//!
//! [`FlowRouter`] receives every inbound [`Update`], loads the chat's [`Session`], looks the
//! `(state, input)` pair up in [`route`] and runs the matching handler of the
//! [`CustomerFlow`] or the [`StaffFlow`].
//!
//! ## Ordering
//!
//! Chats are processed concurrently; updates of one chat are processed one at a time in arrival
//! order (a per-chat async mutex held for the whole turn).
//!
//! ## Errors
//!
//! Handlers return [`FlowError`]. On error the session is left exactly as it was before the
//! update and the error becomes a reply:
//!
//! - `Validation`: the handler's message, so the user can correct the input
//! - `NotFound`: "no longer available"
//! - `Conflict`: "someone else already handled this"
//! - `StoreUnavailable`: logged, generic "try again"

pub mod customer;
pub mod event;
pub mod render;
pub mod reply;
pub mod staff;
pub mod time;

pub use customer::CustomerFlow;
pub use event::{Callback, ChatIdentity, Command, Input, TimeChoice, Update};
pub use reply::{Button, Reply};
pub use staff::StaffFlow;

use crate::clients::{MenuClient, OrderClient, StaffClient, StoreClient, UserClient};
use crate::clock::Clock;
use crate::config::{ConfigError, FlowConfig};
use crate::error::FlowError;
use crate::model::{ChatId, MenuItemId, OrderId, PaymentMethod, StoreId};
use crate::notify::Notifier;
use crate::session::{Cart, FlowState, Session, SessionStore};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

/// Reply to an input the current state does not accept.
pub const STALE_ACTION: &str = "This action is no longer available. Send /new to start a new order.";

/// Flow settings resolved from [`FlowConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSettings {
    pub offset: FixedOffset,
    pub asap: Duration,
    pub fixed_offsets: Vec<u32>,
    pub payment_delay: std::time::Duration,
    pub session_idle: Duration,
}

impl FlowSettings {
    pub fn from_config(config: &FlowConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            offset: config.utc_offset()?,
            asap: Duration::minutes(i64::from(config.asap_minutes)),
            fixed_offsets: config.fixed_offsets.clone(),
            payment_delay: config.payment_delay(),
            session_idle: config.session_idle(),
        })
    }
}

/// Everything a handler may touch.
#[derive(Clone)]
pub struct Services {
    pub users: UserClient,
    pub stores: StoreClient,
    pub menu: MenuClient,
    pub staff: StaffClient,
    pub orders: OrderClient,
    pub notifier: Notifier,
    pub clock: Arc<dyn Clock>,
    pub settings: Arc<FlowSettings>,
}

/// A handler selected by [`route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Start,
    NewOrder,
    Cancel,
    SelectStore(StoreId),
    AddItem(MenuItemId),
    ViewCart,
    EditCart,
    RemoveItem(MenuItemId),
    BackToMenu,
    Checkout,
    SetTime(TimeChoice),
    CustomTimePrompt,
    CustomTimeText(String),
    Pay(PaymentMethod),
    Retry(OrderId),
    ShiftStartRequest,
    ShiftStartConfirm(ChatId),
    ShiftStopRequest,
    ShiftStop,
    Claim(OrderId),
    Issue(OrderId),
}

/// The `(state, input) -> handler` table. `None` rejects the input.
///
/// Commands, cancel and retry are accepted in every state. Staff actions that refer to an order
/// (claim, issue) and the pending list are also accepted in every state because they are
/// validated against the stored staff and order rows rather than the session.
pub fn route(state: FlowState, input: &Input) -> Option<Route> {
    use FlowState as S;

    let browsing = state == S::Idle || state.is_customer();
    let route = match input {
        Input::Command(Command::Start) => Route::Start,
        Input::Command(Command::New) => Route::NewOrder,
        Input::Command(Command::Cancel) => Route::Cancel,
        Input::Command(Command::StartSession) => Route::ShiftStartRequest,
        Input::Command(Command::CloseSession) => Route::ShiftStopRequest,

        Input::Callback(cb) => match (state, *cb) {
            (_, Callback::Cancel) => Route::Cancel,
            (_, Callback::RetryOrder(id)) => Route::Retry(id),
            (_, Callback::StartSession(chat)) => Route::ShiftStartConfirm(chat),
            (_, Callback::StopSession) => Route::ShiftStop,
            (_, Callback::ClaimOrder(id)) => Route::Claim(id),
            (_, Callback::IssueOrder(id)) => Route::Issue(id),

            (S::Idle | S::SelectStore, Callback::ChooseStore) => Route::NewOrder,
            (_, Callback::SelectStore(id)) if browsing => Route::SelectStore(id),
            (_, Callback::AddItem(id)) if browsing => Route::AddItem(id),

            (s, Callback::ViewCart) if s.is_customer() => Route::ViewCart,
            (s, Callback::EditCart) if s.is_customer() => Route::EditCart,
            (s, Callback::RemoveItem(id)) if s.is_customer() => Route::RemoveItem(id),
            (s, Callback::BackToMenu) if s.is_customer() => Route::BackToMenu,

            (S::SelectItems, Callback::Checkout) => Route::Checkout,
            (S::TimeWindow, Callback::SetTime(choice)) => Route::SetTime(choice),
            (S::TimeWindow, Callback::CustomTime) => Route::CustomTimePrompt,
            (S::PaymentMethod, Callback::Pay(method)) => Route::Pay(method),
            _ => return None,
        },

        Input::Text(text) => match state {
            S::CustomTimeInput => Route::CustomTimeText(text.clone()),
            _ => return None,
        },
    };
    Some(route)
}

/// Entry point for inbound updates.
pub struct FlowRouter {
    customer: CustomerFlow,
    staff: StaffFlow,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    session_idle: Duration,
    chat_locks: DashMap<ChatId, Arc<Mutex<()>>>,
}

impl FlowRouter {
    pub fn new(services: Services, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            clock: services.clock.clone(),
            session_idle: services.settings.session_idle,
            customer: CustomerFlow::new(services.clone()),
            staff: StaffFlow::new(services),
            sessions,
            chat_locks: DashMap::new(),
        }
    }

    /// Handles one update and returns the replies for the sending chat.
    pub async fn handle(&self, update: Update) -> Vec<Reply> {
        let chat_id = update.chat.chat_id;
        let lock = self.chat_locks.entry(chat_id).or_default().clone();
        let _turn = lock.lock().await;

        let now = self.clock.now();
        let session = self.load(chat_id, now).await;
        let state = session.state;

        let Some(route) = route(state, &update.input) else {
            debug!(chat = %chat_id, ?state, input = ?update.input, "Rejected input");
            return vec![Reply::text(STALE_ACTION)];
        };

        let span = info_span!("turn", chat = %chat_id, ?state, ?route);
        let mut draft = session.clone();
        match self.run(route, &update.chat, &mut draft).instrument(span).await {
            Ok(replies) => {
                self.store(chat_id, draft, now).await;
                replies
            }
            Err(e) => vec![error_reply(chat_id, &e)],
        }
    }

    /// Drops idle sessions and the locks of chats with no turn in flight.
    pub async fn purge_idle(&self) -> usize {
        let purged = self
            .sessions
            .purge_idle(self.clock.now() - self.session_idle)
            .await;
        self.chat_locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        if purged > 0 {
            info!(purged, "Dropped idle sessions");
        }
        purged
    }

    /// The live session, or a fresh idle one. A session idle for too long counts as absent.
    async fn load(&self, chat_id: ChatId, now: DateTime<Utc>) -> Session {
        match self.sessions.get(chat_id).await {
            Some(s) if now - s.touched_at <= self.session_idle => s,
            Some(_) => {
                debug!(chat = %chat_id, "Session expired");
                self.sessions.clear(chat_id).await;
                Session::new(FlowState::Idle, now)
            }
            None => Session::new(FlowState::Idle, now),
        }
    }

    async fn store(&self, chat_id: ChatId, mut session: Session, now: DateTime<Utc>) {
        if session.state == FlowState::Idle && session.cart == Cart::default() {
            self.sessions.clear(chat_id).await;
        } else {
            session.touched_at = now;
            self.sessions.set(chat_id, session).await;
        }
    }

    async fn run(
        &self,
        route: Route,
        chat: &ChatIdentity,
        session: &mut Session,
    ) -> Result<Vec<Reply>, FlowError> {
        let customer = &self.customer;
        let staff = &self.staff;
        match route {
            Route::Start => customer.start(chat, session).await,
            Route::NewOrder => customer.list_stores(session).await,
            Route::Cancel => Ok(customer.cancel(session)),
            Route::SelectStore(id) => customer.select_store(id, session).await,
            Route::AddItem(id) => customer.add_item(id, session).await,
            Route::ViewCart => customer.view_cart(session).await,
            Route::EditCart => customer.edit_cart(session).await,
            Route::RemoveItem(id) => customer.remove_item(id, session).await,
            Route::BackToMenu => customer.back_to_menu(session).await,
            Route::Checkout => customer.checkout(session),
            Route::SetTime(choice) => customer.set_time(choice, session),
            Route::CustomTimePrompt => Ok(customer.custom_time_prompt(session)),
            Route::CustomTimeText(text) => customer.custom_time_text(&text, session),
            Route::Pay(method) => customer.pay(chat, method, session).await,
            Route::Retry(id) => customer.retry(chat, id).await,
            Route::ShiftStartRequest => staff.shift_start_request(chat, session).await,
            Route::ShiftStartConfirm(target) => {
                staff.shift_start_confirm(chat, target, session).await
            }
            Route::ShiftStopRequest => staff.shift_stop_request(chat, session).await,
            Route::ShiftStop => staff.shift_stop(chat, session).await,
            Route::Claim(id) => staff.claim(chat, id, session).await,
            Route::Issue(id) => staff.issue(chat, id, session).await,
        }
    }
}

fn error_reply(chat_id: ChatId, e: &FlowError) -> Reply {
    match e {
        FlowError::Validation(msg) => {
            debug!(chat = %chat_id, error = %e, "Validation failed");
            Reply::text(msg.clone())
        }
        FlowError::NotFound(_) => {
            info!(chat = %chat_id, error = %e, "Stale reference");
            Reply::text("That is no longer available. Send /new to start over.")
        }
        FlowError::Conflict(_) => {
            info!(chat = %chat_id, error = %e, "Lost a race");
            Reply::text("Someone else already handled this.")
        }
        FlowError::StoreUnavailable(_) => {
            warn!(chat = %chat_id, error = %e, "Backend unavailable");
            Reply::text("Something went wrong. Please try again.")
        }
    }
}
