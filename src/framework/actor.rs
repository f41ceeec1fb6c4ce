//! # Table Actor
//!
//! `ResourceActor<T>` owns every row of one table and processes requests sequentially, so
//! no lock guards the rows and every action is atomic with respect to every other request.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages one table.
///
/// **Concurrency Model**: many clients may send concurrently, but the run loop handles one
/// request at a time. Two staff members claiming the same order send two `Action`s; the first
/// one processed flips the status, the second one sees the new status and fails.
///
/// **Atomicity**: an action runs against a copy of the row, and the copy replaces the stored row
/// only when the action succeeds. A failing transition never leaves a half-applied row.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients, the clock) to `actor.run(context)`.
/// 3. **Run**: spawn the run loop as a tokio task.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    rows: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` is the request channel capacity; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            rows: BTreeMap::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        // "Order" rather than "pickup_bot::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    let mut row = match T::from_create_params(id.clone(), params) {
                        Ok(row) => row,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create rejected");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = row.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.rows.insert(id.clone(), row);
                    info!(entity_type, %id, size = self.rows.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let row = self.rows.get(&id).cloned();
                    debug!(entity_type, %id, found = row.is_some(), "Get");
                    let _ = respond_to.send(Ok(row));
                }
                ResourceRequest::Query { filter, respond_to } => {
                    let rows: Vec<T> = self
                        .rows
                        .values()
                        .filter(|row| filter.matches(row))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = rows.len(), "Query");
                    let _ = respond_to.send(Ok(rows));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(current) = self.rows.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    match draft.handle_action(action, &context).await {
                        Ok(result) => {
                            self.rows.insert(id.clone(), draft);
                            info!(entity_type, %id, "Action ok");
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.rows.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Filter;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u32,
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    enum CounterAction {
        Bump,
        /// Succeeds only while `value` equals the expected number.
        BumpIf(u32),
    }

    #[derive(Debug, thiserror::Error)]
    enum CounterError {
        #[error("empty label")]
        EmptyLabel,
        #[error("expected {expected}, found {found}")]
        Stale { expected: u32, found: u32 },
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = u32;
        type Create = CounterCreate;
        type Action = CounterAction;
        type ActionResult = u32;
        type Context = ();
        type Error = CounterError;

        fn from_create_params(id: u32, params: CounterCreate) -> Result<Self, Self::Error> {
            if params.label.is_empty() {
                return Err(CounterError::EmptyLabel);
            }
            Ok(Self {
                id,
                label: params.label,
                value: 0,
            })
        }

        async fn handle_action(&mut self, action: CounterAction, _: &()) -> Result<u32, Self::Error> {
            match action {
                CounterAction::Bump => {
                    self.value += 1;
                }
                CounterAction::BumpIf(expected) => {
                    // mutate first so a failed action would leak if the actor wrote it back
                    let found = self.value;
                    self.value += 1;
                    if found != expected {
                        return Err(CounterError::Stale { expected, found });
                    }
                }
            }
            Ok(self.value)
        }
    }

    #[tokio::test]
    async fn test_create_get_query_and_action() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run(()));

        let a = client.create(CounterCreate { label: "a".into() }).await.unwrap();
        let b = client.create(CounterCreate { label: "b".into() }).await.unwrap();
        assert_eq!((a, b), (1, 2));

        assert_eq!(client.perform_action(b, CounterAction::Bump).await.unwrap(), 1);

        let bumped = client
            .query(Filter::new(|c: &Counter| c.value > 0))
            .await
            .unwrap();
        assert_eq!(bumped.len(), 1);
        assert_eq!(bumped[0].label, "b");

        let all = client.query(Filter::all()).await.unwrap();
        assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_action_leaves_row_untouched() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run(()));

        let id = client.create(CounterCreate { label: "x".into() }).await.unwrap();
        let err = client
            .perform_action(id, CounterAction::BumpIf(7))
            .await
            .unwrap_err();
        assert!(matches!(
            err.into_entity_error::<CounterError>(),
            Ok(CounterError::Stale { expected: 7, found: 0 })
        ));

        let row = client.get(id).await.unwrap().unwrap();
        assert_eq!(row.value, 0);
    }

    #[tokio::test]
    async fn test_rejected_create_and_unknown_id() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        tokio::spawn(actor.run(()));

        let err = client.create(CounterCreate { label: String::new() }).await.unwrap_err();
        assert!(matches!(err, FrameworkError::EntityError(_)));

        let err = client.perform_action(42, CounterAction::Bump).await.unwrap_err();
        assert!(matches!(err, FrameworkError::NotFound(id) if id == "42"));
        assert!(client.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_actor_reports_unavailable() {
        let (actor, client) = ResourceActor::<Counter>::new(10);
        drop(actor);
        let err = client.get(1).await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
