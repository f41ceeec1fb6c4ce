//! [`ActorEntity`] implementation for [`User`].

use crate::framework::ActorEntity;
use crate::model::{User, UserCreate, UserId};
use crate::user_actor::UserError;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Action = Infallible;
    type ActionResult = ();
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        let display_name = params.display_name.trim();
        if display_name.is_empty() {
            return Err(UserError::Validation("display name is empty".into()));
        }
        Ok(Self {
            id,
            chat_id: params.chat_id,
            username: params.username,
            display_name: display_name.to_string(),
        })
    }

    async fn handle_action(&mut self, action: Infallible, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
