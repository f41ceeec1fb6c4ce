//! [`ActorEntity`] implementation for [`Staff`].

use super::actions::StaffAction;
use crate::clients::StoreClient;
use crate::framework::{ActorClient, ActorEntity};
use crate::model::{Staff, StaffCreate, StaffId, StaffStatus};
use crate::staff_actor::StaffError;
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Staff {
    type Id = StaffId;
    type Create = StaffCreate;
    type Action = StaffAction;
    type ActionResult = Staff;
    type Context = StoreClient;
    type Error = StaffError;

    fn from_create_params(id: StaffId, params: StaffCreate) -> Result<Self, Self::Error> {
        if params.role.trim().is_empty() {
            return Err(StaffError::Validation("role is empty".into()));
        }
        Ok(Self {
            id,
            chat_id: params.chat_id,
            store_id: params.store_id,
            role: params.role,
            status: StaffStatus::Inactive,
        })
    }

    async fn on_create(&mut self, stores: &StoreClient) -> Result<(), Self::Error> {
        match stores.get(self.store_id).await? {
            Some(_) => Ok(()),
            None => Err(StaffError::UnknownStore(self.store_id)),
        }
    }

    async fn handle_action(
        &mut self,
        action: StaffAction,
        _stores: &StoreClient,
    ) -> Result<Staff, Self::Error> {
        match action {
            StaffAction::SetStatus(status) => self.status = status,
        }
        Ok(self.clone())
    }
}
