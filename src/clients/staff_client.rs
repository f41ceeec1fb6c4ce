use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{ChatId, Staff, StaffCreate, StaffId, StaffStatus, StoreId};
use crate::staff_actor::{StaffAction, StaffError};
use async_trait::async_trait;
use tracing::{info, instrument};

/// Client for interacting with the Staff actor.
#[derive(Clone)]
pub struct StaffClient {
    inner: ResourceClient<Staff>,
}

impl StaffClient {
    pub fn new(inner: ResourceClient<Staff>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_staff(&self, params: StaffCreate) -> Result<StaffId, StaffError> {
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// The staff record for a chat, if that chat belongs to a staff member.
    #[instrument(skip(self))]
    pub async fn find_by_chat(&self, chat_id: ChatId) -> Result<Option<Staff>, StaffError> {
        let rows = self
            .query(Filter::new(move |s: &Staff| s.chat_id == chat_id))
            .await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: StaffId, status: StaffStatus) -> Result<Staff, StaffError> {
        let staff = self
            .inner
            .perform_action(id, StaffAction::SetStatus(status))
            .await
            .map_err(Self::map_error)?;
        info!(staff_id = %id, %status, "Shift status changed");
        Ok(staff)
    }

    /// Staff currently on shift at a store.
    pub async fn active_for_store(&self, store_id: StoreId) -> Result<Vec<Staff>, StaffError> {
        self.query(Filter::new(move |s: &Staff| {
            s.store_id == store_id && s.is_active()
        }))
        .await
    }
}

#[async_trait]
impl ActorClient<Staff> for StaffClient {
    type Error = StaffError;

    fn inner(&self) -> &ResourceClient<Staff> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        StaffError::from(e)
    }
}
