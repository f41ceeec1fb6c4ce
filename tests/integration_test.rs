use bigdecimal::BigDecimal;
use chrono::{Duration, TimeZone, Utc};
use pickup_bot::clock::{Clock, ManualClock};
use pickup_bot::config::load_config_from_str;
use pickup_bot::flow::{
    Callback, ChatIdentity, Command, Reply, TimeChoice, Update, STALE_ACTION,
};
use pickup_bot::framework::ActorClient;
use pickup_bot::lifecycle::PickupSystem;
use pickup_bot::model::{
    ChatId, MenuItemId, OrderCreate, OrderId, OrderStatus, PaymentMethod, PickupOption, StoreId,
};
use pickup_bot::notify::{DispatchReport, OrderEvent, RecordingTransport};
use std::sync::Arc;

const CLIENT: i64 = 1001;
const BARISTA: i64 = 2001;
const BARISTA_2: i64 = 2002;
const OTHER_STORE_BARISTA: i64 = 2003;

const CATALOG: &str = r#"
[flow]
utc_offset_hours = 0
payment_delay_ms = 0

[[catalog.stores]]
name = "A"
address = "1 First Street"
opens = "08:00"
closes = "22:00"
menu = [
    { name = "X", price = "100" },
    { name = "Y", price = "50" },
]

[[catalog.stores]]
name = "B"
address = "2 Second Street"
opens = "08:00"
closes = "22:00"
menu = [{ name = "Z", price = "70" }]

[[catalog.staff]]
chat_id = 2001
store = "A"

[[catalog.staff]]
chat_id = 2002
store = "A"

[[catalog.staff]]
chat_id = 2003
store = "B"
"#;

// Catalog ids follow seeding order.
const STORE_A: StoreId = StoreId(1);
const STORE_B: StoreId = StoreId(2);
const ITEM_X: MenuItemId = MenuItemId(1);
const ITEM_Z: MenuItemId = MenuItemId(3);

struct Harness {
    system: PickupSystem,
    clock: Arc<ManualClock>,
    transport: Arc<RecordingTransport>,
}

impl Harness {
    async fn start() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let transport = Arc::new(RecordingTransport::new());
        let config = load_config_from_str(CATALOG).expect("test catalog is valid");
        let system = PickupSystem::start(config, transport.clone(), clock.clone())
            .await
            .expect("system should start");
        Self {
            system,
            clock,
            transport,
        }
    }

    async fn command(&self, chat: i64, command: Command) -> Vec<Reply> {
        self.system
            .router
            .handle(Update::command(identity(chat), command))
            .await
    }

    async fn press(&self, chat: i64, callback: Callback) -> Vec<Reply> {
        self.system
            .router
            .handle(Update::callback(identity(chat), callback))
            .await
    }

    async fn type_text(&self, chat: i64, text: &str) -> Vec<Reply> {
        self.system
            .router
            .handle(Update::text(identity(chat), text))
            .await
    }

    async fn start_shift(&self, staff: i64) {
        let replies = self.command(staff, Command::StartSession).await;
        assert!(offers(&replies, Callback::StartSession(ChatId(staff))));
        self.press(staff, Callback::StartSession(ChatId(staff))).await;
    }

    /// Walks the customer flow from /start to payment with two units of X.
    async fn place_order(&self, client: i64) -> Vec<Reply> {
        self.command(client, Command::Start).await;
        self.press(client, Callback::ChooseStore).await;
        self.press(client, Callback::SelectStore(STORE_A)).await;
        self.press(client, Callback::AddItem(ITEM_X)).await;
        self.press(client, Callback::AddItem(ITEM_X)).await;
        self.press(client, Callback::ViewCart).await;
        self.press(client, Callback::Checkout).await;
        self.press(client, Callback::SetTime(TimeChoice::Minutes(30)))
            .await;
        self.press(client, Callback::Pay(PaymentMethod::Card)).await
    }

    async fn order_status(&self, id: OrderId) -> OrderStatus {
        self.system
            .orders
            .get(id)
            .await
            .unwrap()
            .expect("order exists")
            .status
    }
}

fn identity(chat: i64) -> ChatIdentity {
    ChatIdentity::new(ChatId(chat), format!("chat {chat}"))
}

fn text(replies: &[Reply]) -> String {
    replies
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn offers(replies: &[Reply], callback: Callback) -> bool {
    replies.iter().any(|r| r.offers(callback))
}

/// Full end-to-end flow with all real actors: order, claim, issue.
#[tokio::test]
async fn test_order_placed_claimed_and_issued() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;

    let replies = h.command(CLIENT, Command::Start).await;
    assert!(text(&replies).contains("Hello, chat 1001!"));
    assert!(offers(&replies, Callback::ChooseStore));

    let replies = h.press(CLIENT, Callback::ChooseStore).await;
    assert!(text(&replies).contains("A (open)"));
    assert!(offers(&replies, Callback::SelectStore(STORE_B)));

    let replies = h.press(CLIENT, Callback::SelectStore(STORE_A)).await;
    assert!(offers(&replies, Callback::AddItem(ITEM_X)));
    assert!(!offers(&replies, Callback::AddItem(ITEM_Z)));

    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;
    let replies = h.press(CLIENT, Callback::AddItem(ITEM_X)).await;
    assert!(text(&replies).contains("X added"));

    let replies = h.press(CLIENT, Callback::ViewCart).await;
    assert!(text(&replies).contains("X x2 = 200.00"));
    assert!(text(&replies).contains("Total: 200.00"));

    let replies = h.press(CLIENT, Callback::Checkout).await;
    assert!(offers(&replies, Callback::SetTime(TimeChoice::Asap)));
    assert!(offers(&replies, Callback::SetTime(TimeChoice::Minutes(45))));

    let replies = h
        .press(CLIENT, Callback::SetTime(TimeChoice::Minutes(30)))
        .await;
    assert!(text(&replies).contains("12:30"));
    assert!(offers(&replies, Callback::Pay(PaymentMethod::Sbp)));

    let replies = h.press(CLIENT, Callback::Pay(PaymentMethod::Card)).await;
    assert!(text(&replies).contains("Order #1 placed. Total: 200.00"));

    let order = h.system.orders.get(OrderId(1)).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.store_id, STORE_A);
    assert_eq!(order.total_price, BigDecimal::from(200));
    assert_eq!(order.pickup_option, PickupOption::InMinutes(30));
    assert_eq!(order.target_ready_at, Some(h.clock.now() + Duration::minutes(30)));

    // Only staff on shift at the order's store hear about it.
    let pushes = h.transport.sent_to(ChatId(BARISTA));
    assert_eq!(pushes.len(), 1);
    assert!(pushes[0].offers(Callback::ClaimOrder(OrderId(1))));
    assert!(h.transport.sent_to(ChatId(BARISTA_2)).is_empty());
    assert!(h.transport.sent_to(ChatId(OTHER_STORE_BARISTA)).is_empty());

    let replies = h.press(BARISTA, Callback::ClaimOrder(OrderId(1))).await;
    assert!(offers(&replies, Callback::IssueOrder(OrderId(1))));
    assert!(text(&replies).contains("X x2"));
    assert_eq!(h.order_status(OrderId(1)).await, OrderStatus::Accepted);

    let replies = h.press(BARISTA, Callback::IssueOrder(OrderId(1))).await;
    assert!(offers(&replies, Callback::StartSession(ChatId(BARISTA))));
    assert_eq!(h.order_status(OrderId(1)).await, OrderStatus::Completed);

    let client_pushes = h.transport.sent_to(ChatId(CLIENT));
    assert_eq!(client_pushes.len(), 2);
    assert!(client_pushes[0].text.contains("accepted"));
    assert!(client_pushes[1].text.contains("ready"));

    // The session ended with the order.
    assert_eq!(h.press(CLIENT, Callback::ViewCart).await, vec![Reply::text(STALE_ACTION)]);
}

#[tokio::test]
async fn test_concurrent_claims_have_exactly_one_winner() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    h.start_shift(BARISTA_2).await;
    h.place_order(CLIENT).await;

    let (first, second) = tokio::join!(
        h.press(BARISTA, Callback::ClaimOrder(OrderId(1))),
        h.press(BARISTA_2, Callback::ClaimOrder(OrderId(1))),
    );

    let winners = [&first, &second]
        .iter()
        .filter(|r| offers(r, Callback::IssueOrder(OrderId(1))))
        .count();
    assert_eq!(winners, 1);
    let loser = if offers(&first, Callback::IssueOrder(OrderId(1))) {
        &second
    } else {
        &first
    };
    assert!(text(loser).contains("already handled by someone else"));

    let order = h.system.orders.get(OrderId(1)).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    assert!(matches!(order.assigned_staff, Some(ChatId(BARISTA | BARISTA_2))));
    assert_eq!(h.transport.sent_to(ChatId(CLIENT)).len(), 1);
}

#[tokio::test]
async fn test_unaccepted_order_expires_and_retry_requeues_it() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    h.place_order(CLIENT).await;
    let sweeper = h.system.sweeper();

    h.clock.advance(Duration::minutes(10));
    assert_eq!(sweeper.tick().await.expired, 0);

    h.clock.advance(Duration::minutes(6));
    assert_eq!(sweeper.tick().await.expired, 1);
    assert_eq!(h.order_status(OrderId(1)).await, OrderStatus::Cancelled);

    let pushes = h.transport.sent_to(ChatId(CLIENT));
    assert_eq!(pushes.len(), 1);
    assert!(pushes[0].offers(Callback::RetryOrder(OrderId(1))));
    assert!(pushes[0].offers(Callback::Cancel));

    // Already cancelled: a second sweep has nothing to do.
    assert_eq!(sweeper.tick().await.expired, 0);

    let replies = h.press(CLIENT, Callback::RetryOrder(OrderId(1))).await;
    assert!(text(&replies).contains("back in the queue"));
    let order = h.system.orders.get(OrderId(1)).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.created_at, h.clock.now());

    // Staff are told again, and the retried order gets a fresh window.
    assert_eq!(h.transport.sent_to(ChatId(BARISTA)).len(), 2);
    h.clock.advance(Duration::minutes(14));
    assert_eq!(sweeper.tick().await.expired, 0);

    // Retrying an order that is not cancelled is refused.
    let replies = h.press(CLIENT, Callback::RetryOrder(OrderId(1))).await;
    assert_eq!(replies, vec![Reply::text("Someone else already handled this.")]);
}

#[tokio::test]
async fn test_claim_racing_the_sweep_has_exactly_one_winner() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    h.place_order(CLIENT).await;
    let sweeper = h.system.sweeper();

    h.clock.advance(Duration::minutes(16));
    let (report, claim) = tokio::join!(
        sweeper.tick(),
        h.press(BARISTA, Callback::ClaimOrder(OrderId(1))),
    );

    let claimed = offers(&claim, Callback::IssueOrder(OrderId(1)));
    let expired = report.expired == 1;
    assert!(claimed != expired, "exactly one of claim and expiry wins");

    let status = h.order_status(OrderId(1)).await;
    if claimed {
        assert_eq!(status, OrderStatus::Accepted);
    } else {
        assert_eq!(status, OrderStatus::Cancelled);
        assert!(text(&claim).contains("already handled by someone else"));
    }

    // The customer hears either "accepted" or "cancelled", never both.
    let pushes = h.transport.sent_to(ChatId(CLIENT));
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].offers(Callback::RetryOrder(OrderId(1))), expired);
}

#[tokio::test]
async fn test_sweep_skips_young_and_claimed_orders() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    let orders = &h.system.orders;
    let params = || OrderCreate {
        client: ChatId(CLIENT),
        store_id: STORE_A,
        items: [(ITEM_X, 1)].into_iter().collect(),
        pickup_option: PickupOption::Asap,
        target_ready_at: None,
        payment_method: PaymentMethod::Sbp,
    };

    let claimed = orders.create_order(params()).await.unwrap();
    let stale = orders.create_order(params()).await.unwrap();
    let barista = h
        .system
        .staff
        .find_by_chat(ChatId(BARISTA))
        .await
        .unwrap()
        .unwrap();
    orders.claim_order(claimed.id, &barista).await.unwrap();

    h.clock.advance(Duration::minutes(16));
    let young = orders.create_order(params()).await.unwrap();

    let expired = h.system.sweeper().tick().await;
    assert_eq!(expired.expired, 1);
    assert_eq!(h.order_status(stale.id).await, OrderStatus::Cancelled);
    assert_eq!(h.order_status(claimed.id).await, OrderStatus::Accepted);
    assert_eq!(h.order_status(young.id).await, OrderStatus::Created);
}

#[tokio::test]
async fn test_assigned_staff_is_reminded_once() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    h.place_order(CLIENT).await;
    h.press(BARISTA, Callback::ClaimOrder(OrderId(1))).await;
    let sweeper = h.system.sweeper();

    // Pickup at 12:30, reminders 5 minutes ahead.
    h.clock.advance(Duration::minutes(20));
    assert_eq!(sweeper.tick().await.reminded, 0);

    h.clock.advance(Duration::minutes(6));
    assert_eq!(sweeper.tick().await.reminded, 1);
    let pushes = h.transport.sent_to(ChatId(BARISTA));
    let reminder = pushes.last().unwrap();
    assert!(reminder.text.contains("due soon"));
    assert!(reminder.offers(Callback::IssueOrder(OrderId(1))));

    assert_eq!(sweeper.tick().await.reminded, 0);
}

#[tokio::test]
async fn test_order_is_priced_when_placed() {
    let h = Harness::start().await;
    h.command(CLIENT, Command::Start).await;
    h.press(CLIENT, Callback::SelectStore(STORE_A)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;
    h.press(CLIENT, Callback::Checkout).await;
    h.press(CLIENT, Callback::SetTime(TimeChoice::Asap)).await;

    // Price changes between checkout and payment count.
    h.system.menu.set_price(ITEM_X, 120.into()).await.unwrap();
    let replies = h.press(CLIENT, Callback::Pay(PaymentMethod::Sbp)).await;
    assert!(text(&replies).contains("Total: 240.00"));

    // Later changes do not touch the placed order.
    h.system.menu.set_price(ITEM_X, 150.into()).await.unwrap();
    let order = h.system.orders.get(OrderId(1)).await.unwrap().unwrap();
    assert_eq!(order.total_price, BigDecimal::from(240));
    assert_eq!(order.pickup_option, PickupOption::Asap);
    assert_eq!(order.target_ready_at, Some(h.clock.now() + Duration::minutes(15)));
}

#[tokio::test]
async fn test_cart_is_repriced_on_every_view() {
    let h = Harness::start().await;
    h.press(CLIENT, Callback::SelectStore(STORE_A)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;

    let replies = h.press(CLIENT, Callback::ViewCart).await;
    assert!(text(&replies).contains("Total: 200.00"));

    h.system.menu.set_price(ITEM_X, 130.into()).await.unwrap();
    let replies = h.press(CLIENT, Callback::ViewCart).await;
    assert!(text(&replies).contains("X x2 = 260.00"));
    assert!(text(&replies).contains("Total: 260.00"));

    // Removing the last unit empties the cart and goes back to the menu.
    h.press(CLIENT, Callback::EditCart).await;
    h.press(CLIENT, Callback::RemoveItem(ITEM_X)).await;
    let replies = h.press(CLIENT, Callback::RemoveItem(ITEM_X)).await;
    assert!(text(&replies).contains("Your cart is empty."));
    assert!(offers(&replies, Callback::AddItem(ITEM_X)));

    let replies = h.press(CLIENT, Callback::Checkout).await;
    assert_eq!(replies, vec![Reply::text("Your cart is empty.")]);
}

#[tokio::test]
async fn test_invalid_inputs_keep_the_session() {
    let h = Harness::start().await;

    // Nothing to check out from an idle chat.
    let replies = h.press(CLIENT, Callback::Checkout).await;
    assert_eq!(replies, vec![Reply::text(STALE_ACTION)]);

    h.press(CLIENT, Callback::SelectStore(STORE_A)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;

    let replies = h.press(CLIENT, Callback::AddItem(ITEM_Z)).await;
    assert!(text(&replies).contains("another store"));

    h.press(CLIENT, Callback::Checkout).await;
    let replies = h
        .press(CLIENT, Callback::SetTime(TimeChoice::Minutes(17)))
        .await;
    assert!(text(&replies).contains("not offered"));

    h.press(CLIENT, Callback::CustomTime).await;
    let replies = h.type_text(CLIENT, "25:99").await;
    assert!(!offers(&replies, Callback::Pay(PaymentMethod::Card)));

    let replies = h.type_text(CLIENT, "14:00").await;
    assert!(text(&replies).contains("Pickup at 14:00 accepted"));
    assert!(offers(&replies, Callback::Pay(PaymentMethod::Card)));

    // The cart survived every rejection: one X.
    let replies = h.press(CLIENT, Callback::Pay(PaymentMethod::Card)).await;
    assert!(text(&replies).contains("Total: 100.00"));
}

#[tokio::test]
async fn test_cancel_clears_the_cart() {
    let h = Harness::start().await;
    h.press(CLIENT, Callback::SelectStore(STORE_A)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;

    let replies = h.command(CLIENT, Command::Cancel).await;
    assert_eq!(replies, vec![Reply::text("Cancelled.")]);
    assert!(h.system.sessions.is_empty());
    assert_eq!(h.press(CLIENT, Callback::ViewCart).await, vec![Reply::text(STALE_ACTION)]);
}

#[tokio::test]
async fn test_only_registered_staff_can_start_a_shift() {
    let h = Harness::start().await;
    let replies = h.command(CLIENT, Command::StartSession).await;
    assert!(text(&replies).contains("Access denied"));

    // A confirmation button aimed at someone else is refused.
    h.command(BARISTA, Command::StartSession).await;
    let replies = h.press(BARISTA, Callback::StartSession(ChatId(BARISTA_2))).await;
    assert!(text(&replies).contains("not meant for you"));

    h.start_shift(BARISTA).await;
    let staff = h.system.staff.find_by_chat(ChatId(BARISTA)).await.unwrap().unwrap();
    assert!(staff.is_active());

    h.command(BARISTA, Command::CloseSession).await;
    h.press(BARISTA, Callback::StopSession).await;
    let staff = h.system.staff.find_by_chat(ChatId(BARISTA)).await.unwrap().unwrap();
    assert!(!staff.is_active());
}

#[tokio::test]
async fn test_idle_sessions_are_dropped() {
    let h = Harness::start().await;
    h.press(CLIENT, Callback::SelectStore(STORE_A)).await;
    h.press(CLIENT, Callback::AddItem(ITEM_X)).await;
    assert_eq!(h.system.sessions.len(), 1);

    h.clock.advance(Duration::minutes(121));
    assert_eq!(h.system.sweeper().tick().await.purged, 1);
    assert!(h.system.sessions.is_empty());
    assert_eq!(h.press(CLIENT, Callback::ViewCart).await, vec![Reply::text(STALE_ACTION)]);
}

#[tokio::test]
async fn test_failed_delivery_does_not_undo_the_order() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    h.start_shift(BARISTA_2).await;
    h.transport.fail_for(ChatId(BARISTA));

    let replies = h.place_order(CLIENT).await;
    assert!(text(&replies).contains("Order #1 placed"));
    assert_eq!(h.order_status(OrderId(1)).await, OrderStatus::Created);
    assert!(h.transport.sent_to(ChatId(BARISTA)).is_empty());
    assert_eq!(h.transport.sent_to(ChatId(BARISTA_2)).len(), 1);

    let order = h.system.orders.get(OrderId(1)).await.unwrap().unwrap();
    let report = h.system.notifier.dispatch(&OrderEvent::Created(order)).await;
    assert_eq!(report, DispatchReport { delivered: 1, failed: 1 });
}

#[tokio::test]
async fn test_claim_errors_do_not_leak_row_ids() {
    let h = Harness::start().await;
    h.start_shift(BARISTA).await;
    h.start_shift(OTHER_STORE_BARISTA).await;
    h.place_order(CLIENT).await;

    let replies = h
        .press(OTHER_STORE_BARISTA, Callback::ClaimOrder(OrderId(1)))
        .await;
    assert_eq!(replies, vec![Reply::text("This order belongs to another store.")]);

    h.command(BARISTA, Command::CloseSession).await;
    h.press(BARISTA, Callback::StopSession).await;
    let replies = h.press(BARISTA, Callback::ClaimOrder(OrderId(1))).await;
    assert_eq!(replies, vec![Reply::text("You are not on shift.")]);
    assert_eq!(h.order_status(OrderId(1)).await, OrderStatus::Created);
}
