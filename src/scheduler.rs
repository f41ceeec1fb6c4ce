//! # Sweep Scheduler
//!
//! A background task that wakes up on a fixed interval and:
//!
//! 1. expires `Created` orders nobody accepted within the expiry window and tells their customers,
//! 2. reminds staff of accepted orders whose pickup time is close,
//! 3. drops idle chat sessions.
//!
//! A failing tick is logged and the next tick simply tries again. Expiry is an order-actor action
//! with its own status check, so a sweep racing a claim or a retry never overwrites it.

use crate::clients::OrderClient;
use crate::clock::Clock;
use crate::config::OrdersConfig;
use crate::flow::FlowRouter;
use crate::notify::{Notifier, OrderEvent};
use chrono::Duration;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub reminded: usize,
    pub purged: usize,
}

pub struct Sweeper {
    orders: OrderClient,
    notifier: Notifier,
    router: Arc<FlowRouter>,
    clock: Arc<dyn Clock>,
    expiry: Duration,
    reminder_lead: Duration,
    interval: std::time::Duration,
}

impl Sweeper {
    pub fn new(
        orders: OrderClient,
        notifier: Notifier,
        router: Arc<FlowRouter>,
        clock: Arc<dyn Clock>,
        config: &OrdersConfig,
    ) -> Self {
        Self {
            orders,
            notifier,
            router,
            clock,
            expiry: config.expiry(),
            reminder_lead: config.reminder_lead(),
            interval: config.sweep_interval(),
        }
    }

    /// Runs one sweep.
    pub async fn tick(&self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        match self.orders.sweep_expired(now, self.expiry).await {
            Ok(expired) => {
                for order in expired {
                    self.notifier.dispatch(&OrderEvent::Expired(order)).await;
                    report.expired += 1;
                }
            }
            Err(e) => warn!(error = %e, "Expiry sweep failed"),
        }

        match self.orders.due_for_reminder(now, self.reminder_lead).await {
            Ok(due) => {
                for order in due {
                    self.notifier.dispatch(&OrderEvent::DueSoon(order)).await;
                    report.reminded += 1;
                }
            }
            Err(e) => warn!(error = %e, "Reminder sweep failed"),
        }

        report.purged = self.router.purge_idle().await;
        debug!(?report, "Sweep done");
        report
    }

    /// Ticks until `cancel` fires. The first tick runs immediately.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(every = ?self.interval, expiry = %self.expiry, "Sweeper started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
        info!("Sweeper stopped");
    }
}
