//! # Menu Client
//!
//! Catalog reads for the chat flows, plus the re-pricing hook.
use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::menu_actor::{MenuAction, MenuError};
use crate::model::{MenuItem, MenuItemCreate, MenuItemId, StoreId};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use tracing::{debug, instrument};

/// Client for interacting with the Menu actor.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
}

impl MenuClient {
    pub fn new(inner: ResourceClient<MenuItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, params: MenuItemCreate) -> Result<MenuItemId, MenuError> {
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Items of one store, in id order.
    #[instrument(skip(self))]
    pub async fn items_for_store(&self, store_id: StoreId) -> Result<Vec<MenuItem>, MenuError> {
        self.query(Filter::new(move |item: &MenuItem| item.store_id == store_id))
            .await
    }

    /// Re-prices an item and returns the updated row.
    #[instrument(skip(self))]
    pub async fn set_price(&self, id: MenuItemId, price: BigDecimal) -> Result<MenuItem, MenuError> {
        debug!(%id, %price, "Re-pricing item");
        self.inner
            .perform_action(id, MenuAction::SetPrice(price))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<MenuItem> for MenuClient {
    type Error = MenuError;

    fn inner(&self) -> &ResourceClient<MenuItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MenuError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::StoreClient;
    use crate::framework::mock::{create_mock_client, expect_action};
    use crate::model::StoreCreate;
    use chrono::NaiveTime;

    #[tokio::test]
    async fn test_set_price_sends_action_and_returns_row() {
        let (client, mut receiver) = create_mock_client::<MenuItem>(10);
        let menu = MenuClient::new(client);

        let task = tokio::spawn(async move { menu.set_price(MenuItemId(3), BigDecimal::from(150)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, MenuItemId(3));
        let MenuAction::SetPrice(price) = action;
        assert_eq!(price, BigDecimal::from(150));

        responder
            .send(Ok(MenuItem {
                id,
                store_id: StoreId(1),
                name: "Latte".into(),
                price,
            }))
            .unwrap();

        let item = task.await.unwrap().unwrap();
        assert_eq!(item.price, BigDecimal::from(150));
    }

    #[tokio::test]
    async fn test_item_creation_checks_store_and_price() {
        let (store_actor, stores) = crate::store_actor::new();
        let stores = StoreClient::new(stores);
        tokio::spawn(store_actor.run(()));
        let (menu_actor, menu) = crate::menu_actor::new();
        let menu = MenuClient::new(menu);
        tokio::spawn(menu_actor.run(stores.clone()));

        let store_id = stores
            .create_store(StoreCreate {
                name: "Corner".into(),
                address: "Main st. 1".into(),
                opening_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                closing_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        let err = menu
            .create_item(MenuItemCreate {
                store_id: StoreId(99),
                name: "Ghost".into(),
                price: BigDecimal::from(1),
            })
            .await
            .unwrap_err();
        assert_eq!(err, MenuError::UnknownStore(StoreId(99)));

        let err = menu
            .create_item(MenuItemCreate {
                store_id,
                name: "Refund".into(),
                price: BigDecimal::from(-1),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, MenuError::Validation(_)));

        let latte = menu
            .create_item(MenuItemCreate {
                store_id,
                name: "Latte".into(),
                price: BigDecimal::from(100),
            })
            .await
            .unwrap();
        let items = menu.items_for_store(store_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, latte);
    }
}
