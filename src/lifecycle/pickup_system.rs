use crate::clients::{MenuClient, OrderClient, StaffClient, StoreClient, UserClient};
use crate::clock::Clock;
use crate::config::{CatalogConfig, PickupConfig};
use crate::error::SystemError;
use crate::flow::{FlowRouter, FlowSettings, Services};
use crate::model::{ChatId, MenuItemCreate, StaffCreate, StoreCreate, StoreId};
use crate::notify::{ChatTransport, Notifier};
use crate::order_actor::OrderContext;
use crate::scheduler::Sweeper;
use crate::session::{InMemorySessionStore, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// The running service: table actors, the flow router and, once started, the sweeper.
///
/// Actors receive their dependencies when they are started:
///
/// | Actor | Context |
/// |-------|---------|
/// | user, store | `()` |
/// | menu, staff | [`StoreClient`] |
/// | order | [`OrderContext`] (menu client and clock) |
///
/// ```ignore
/// let mut system = PickupSystem::start(config, transport, Arc::new(SystemClock)).await?;
/// system.spawn_sweeper();
/// let replies = system.router.handle(update).await;
/// system.shutdown().await?;
/// ```
pub struct PickupSystem {
    pub users: UserClient,
    pub stores: StoreClient,
    pub menu: MenuClient,
    pub staff: StaffClient,
    pub orders: OrderClient,
    pub notifier: Notifier,
    pub router: Arc<FlowRouter>,
    pub sessions: Arc<InMemorySessionStore>,
    clock: Arc<dyn Clock>,
    config: PickupConfig,
    cancel: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
    handles: Vec<JoinHandle<()>>,
}

impl PickupSystem {
    /// Spawns the actors, seeds the configured catalog and wires the flows.
    pub async fn start(
        config: PickupConfig,
        transport: Arc<dyn ChatTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SystemError> {
        config.validate()?;
        let settings = Arc::new(FlowSettings::from_config(&config.flow)?);

        let (user_actor, user_client) = crate::user_actor::new();
        let (store_actor, store_client) = crate::store_actor::new();
        let (menu_actor, menu_client) = crate::menu_actor::new();
        let (staff_actor, staff_client) = crate::staff_actor::new();
        let (order_actor, order_client) = crate::order_actor::new();

        let users = UserClient::new(user_client);
        let stores = StoreClient::new(store_client);
        let menu = MenuClient::new(menu_client);
        let staff = StaffClient::new(staff_client);
        let orders = OrderClient::new(order_client);

        let handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(store_actor.run(())),
            tokio::spawn(menu_actor.run(stores.clone())),
            tokio::spawn(staff_actor.run(stores.clone())),
            tokio::spawn(order_actor.run(OrderContext::new(menu.clone(), clock.clone()))),
        ];

        seed_catalog(&config.catalog, &stores, &menu, &staff).await?;

        let notifier = Notifier::new(transport, staff.clone(), menu.clone(), settings.offset);
        let sessions = Arc::new(InMemorySessionStore::new());
        let services = Services {
            users: users.clone(),
            stores: stores.clone(),
            menu: menu.clone(),
            staff: staff.clone(),
            orders: orders.clone(),
            notifier: notifier.clone(),
            clock: clock.clone(),
            settings,
        };
        let router = Arc::new(FlowRouter::new(
            services,
            sessions.clone() as Arc<dyn SessionStore>,
        ));

        info!(
            stores = config.catalog.stores.len(),
            staff = config.catalog.staff.len(),
            "System started"
        );
        Ok(Self {
            users,
            stores,
            menu,
            staff,
            orders,
            notifier,
            router,
            sessions,
            clock,
            config,
            cancel: CancellationToken::new(),
            sweeper: None,
            handles,
        })
    }

    /// A sweeper over this system's orders and sessions, for driving ticks by hand.
    pub fn sweeper(&self) -> Sweeper {
        Sweeper::new(
            self.orders.clone(),
            self.notifier.clone(),
            self.router.clone(),
            self.clock.clone(),
            &self.config.orders,
        )
    }

    /// Starts the periodic sweep. Calling it again has no effect.
    pub fn spawn_sweeper(&mut self) {
        if self.sweeper.is_none() {
            let sweeper = self.sweeper();
            self.sweeper = Some(tokio::spawn(sweeper.run(self.cancel.clone())));
        }
    }

    /// Stops the sweeper, closes every client and waits for the actors to drain.
    ///
    /// Clones of the router or clients held elsewhere keep their actors alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        self.cancel.cancel();
        if let Some(sweeper) = self.sweeper {
            sweeper.await?;
        }

        drop(self.router);
        drop(self.notifier);
        drop(self.users);
        drop(self.stores);
        drop(self.menu);
        drop(self.staff);
        drop(self.orders);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(e.into());
            }
        }
        info!("System shutdown complete.");
        Ok(())
    }
}

async fn seed_catalog(
    catalog: &CatalogConfig,
    stores: &StoreClient,
    menu: &MenuClient,
    staff: &StaffClient,
) -> Result<(), SystemError> {
    let mut by_name: HashMap<&str, StoreId> = HashMap::new();
    for seed in &catalog.stores {
        let (opening_time, closing_time) = seed.hours()?;
        let store_id = stores
            .create_store(StoreCreate {
                name: seed.name.clone(),
                address: seed.address.clone(),
                opening_time,
                closing_time,
            })
            .await
            .map_err(|e| seed_error(format!("store {:?}", seed.name), e))?;
        by_name.insert(seed.name.as_str(), store_id);

        for item in &seed.menu {
            menu.create_item(MenuItemCreate {
                store_id,
                name: item.name.clone(),
                price: item.price.clone(),
            })
            .await
            .map_err(|e| seed_error(format!("menu item {:?}", item.name), e))?;
        }
    }

    for member in &catalog.staff {
        let store_id = by_name
            .get(member.store.as_str())
            .copied()
            .ok_or_else(|| SystemError::Seed {
                what: format!("staff {}", member.chat_id),
                reason: format!("unknown store {:?}", member.store),
            })?;
        staff
            .create_staff(StaffCreate {
                chat_id: ChatId(member.chat_id),
                store_id,
                role: member.role.clone(),
            })
            .await
            .map_err(|e| seed_error(format!("staff {}", member.chat_id), e))?;
    }
    Ok(())
}

fn seed_error(what: String, e: impl std::fmt::Display) -> SystemError {
    SystemError::Seed {
        what,
        reason: e.to_string(),
    }
}
