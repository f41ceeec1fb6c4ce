//! # Observability & Tracing
//!
//! Structured logging for the whole service. The level comes from `RUST_LOG` and defaults to
//! `info`. Output is the compact format without module paths; every log line carries the
//! structured fields of its spans instead (`turn{chat=... state=... route=...}` for a chat
//! update, `create{entity_type="Order"}` inside an actor).
//!
//! ```bash
//! # Order lifecycle, shifts and sweeps
//! RUST_LOG=info cargo run
//!
//! # Every actor request and dispatch report
//! RUST_LOG=debug cargo run
//!
//! # Only the flows
//! RUST_LOG=pickup_bot::flow=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a placed and claimed order reads:
//!
//! ```text
//! INFO turn:create_order: Order created order_id=order_1 total=200
//! INFO turn: Order placed order_id=order_1 client=1001
//! INFO turn:claim_order: Order claimed order_id=order_1 staff=2001
//! ```
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
