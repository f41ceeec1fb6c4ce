//! [`ActorEntity`] implementation for [`MenuItem`].

use super::actions::MenuAction;
use crate::clients::StoreClient;
use crate::framework::{ActorClient, ActorEntity};
use crate::menu_actor::MenuError;
use crate::model::{MenuItem, MenuItemCreate, MenuItemId};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};

fn check_price(price: &BigDecimal) -> Result<(), MenuError> {
    if *price < BigDecimal::zero() {
        return Err(MenuError::Validation(format!("negative price {price}")));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Action = MenuAction;
    type ActionResult = MenuItem;
    type Context = StoreClient;
    type Error = MenuError;

    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, Self::Error> {
        check_price(&params.price)?;
        if params.name.trim().is_empty() {
            return Err(MenuError::Validation("item name is empty".into()));
        }
        Ok(Self {
            id,
            store_id: params.store_id,
            name: params.name,
            price: params.price,
        })
    }

    /// Rejects items of stores that do not exist.
    async fn on_create(&mut self, stores: &StoreClient) -> Result<(), Self::Error> {
        match stores.get(self.store_id).await? {
            Some(_) => Ok(()),
            None => Err(MenuError::UnknownStore(self.store_id)),
        }
    }

    async fn handle_action(
        &mut self,
        action: MenuAction,
        _stores: &StoreClient,
    ) -> Result<MenuItem, Self::Error> {
        match action {
            MenuAction::SetPrice(price) => {
                check_price(&price)?;
                self.price = price;
            }
        }
        Ok(self.clone())
    }
}
