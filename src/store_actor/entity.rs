//! [`ActorEntity`] implementation for [`Store`].

use crate::framework::ActorEntity;
use crate::model::{Store, StoreCreate, StoreId};
use crate::store_actor::StoreError;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Store {
    type Id = StoreId;
    type Create = StoreCreate;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = StoreError;

    fn from_create_params(id: StoreId, params: StoreCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(StoreError::Validation("store name is empty".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            address: params.address,
            opening_time: params.opening_time,
            closing_time: params.closing_time,
        })
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
