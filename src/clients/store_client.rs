use crate::framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use crate::model::{Store, StoreCreate, StoreId};
use crate::store_actor::StoreError;
use async_trait::async_trait;
use tracing::instrument;

/// Client for interacting with the Store actor.
#[derive(Clone)]
pub struct StoreClient {
    inner: ResourceClient<Store>,
}

impl StoreClient {
    pub fn new(inner: ResourceClient<Store>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_store(&self, params: StoreCreate) -> Result<StoreId, StoreError> {
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Every store, in id order.
    pub async fn list_stores(&self) -> Result<Vec<Store>, StoreError> {
        self.query(Filter::all()).await
    }
}

#[async_trait]
impl ActorClient<Store> for StoreClient {
    type Error = StoreError;

    fn inner(&self) -> &ResourceClient<Store> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        StoreError::from(e)
    }
}
