use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{ChatId, User, UserCreate};
use crate::user_actor::UserError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn find_by_chat(&self, chat_id: ChatId) -> Result<Option<User>, UserError> {
        let users = self
            .query(Filter::new(move |u: &User| u.chat_id == chat_id))
            .await?;
        Ok(users.into_iter().next())
    }

    /// Returns the user for `params.chat_id`, registering it on first contact.
    ///
    /// Callers serialize per chat, so two registrations for the same chat never race.
    #[instrument(skip(self))]
    pub async fn register(&self, params: UserCreate) -> Result<User, UserError> {
        if let Some(existing) = self.find_by_chat(params.chat_id).await? {
            debug!(user_id = %existing.id, "Already registered");
            return Ok(existing);
        }
        let chat_id = params.chat_id;
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(user_id = %id, %chat_id, "Registered user");
        self.get(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        UserError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_is_idempotent_per_chat() {
        let (actor, client) = crate::user_actor::new();
        tokio::spawn(actor.run(()));
        let users = UserClient::new(client);

        let params = UserCreate {
            chat_id: ChatId(42),
            username: Some("alice".into()),
            display_name: "Alice".into(),
        };
        let first = users.register(params.clone()).await.unwrap();
        let second = users.register(params).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(users.query(Filter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let (actor, client) = crate::user_actor::new();
        tokio::spawn(actor.run(()));
        let users = UserClient::new(client);

        let err = users
            .register(UserCreate {
                chat_id: ChatId(1),
                username: None,
                display_name: "  ".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation(_)));
    }
}
