//! # ActorClient Trait
//!
//! Shared read operations for the typed per-table clients, built on a generic `ResourceClient`.

use crate::framework::{ActorEntity, FrameworkError, Filter, ResourceClient};
use async_trait::async_trait;

/// Trait for table-specific clients to inherit `get` and `query`.
///
/// Implementors only provide access to the inner client and a mapping from framework errors to
/// their own error enum.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The table-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the table's error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a row by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every row matching `filter`, in id order.
    #[tracing::instrument(skip(self))]
    async fn query(&self, filter: Filter<T>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(filter).await.map_err(Self::map_error)
    }
}
