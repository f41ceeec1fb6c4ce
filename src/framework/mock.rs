//! # Mock Clients & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from a
//! queue of expectations instead of by a table actor. Use it to test an actor or a typed client
//! while isolating the tables it depends on, e.g. the order actor with a mocked menu.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None, scripted replies | Real rows |
//! | **Use Case** | Logic *around* a client, dependency isolation | The actor itself, full system |
//! | **Error Injection** | `return_err(FrameworkError::ActorClosed)` | Hard |
//!
//! ```rust
//! use pickup_bot::framework::mock::MockClient;
//! use pickup_bot::framework::FrameworkError;
//! use pickup_bot::model::{MenuItem, MenuItemId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<MenuItem>::new();
//!     mock.expect_get(MenuItemId(1)).return_err(FrameworkError::ActorClosed);
//!
//!     let result = mock.client().get(MenuItemId(1)).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! For request-level assertions use [`create_mock_client`] together with [`expect_action`] or
//! [`expect_get`]: the test receives the raw request and answers it by hand.

use crate::framework::client::ResourceClient;
use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// A scripted reply, consumed in FIFO order.
enum Expectation<T: ActorEntity> {
    Get {
        id: T::Id,
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Query {
        response: Result<Vec<T>, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock table with expectation tracking.
///
/// Requests whose kind or id do not match the next expectation panic inside the mock task, which
/// surfaces in the caller as [`FrameworkError::ActorDropped`] and leaves the expectation queued
/// so `verify()` fails as well.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();
                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "get called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Query { respond_to, .. },
                        Some(Expectation::Query { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) => {
                        assert_eq!(id, expected, "action called with unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        if let Some(expectation) = expectation {
                            queue.lock().unwrap().push_front(expectation);
                        }
                        panic!("Unexpected request: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| Expectation::Get {
            id,
            response,
        })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Create {
            response,
        })
    }

    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Query {
            response,
        })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Action { id, response }
        })
    }

    /// Panics unless every expectation has been consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Completes an expectation with its scripted reply.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        expectations: Queue<T>,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            build: Box::new(build),
        }
    }

    pub fn return_ok(self, value: R) {
        let expectation = (self.build)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.build)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

/// Creates a client and the receiver its requests land on.
///
/// The test plays the actor: it pulls requests with [`expect_get`] / [`expect_action`] and
/// answers through the returned responder.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is a `Get`.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an `Action`.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    #[derive(Debug)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug)]
    enum NoteAction {
        Append(String),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note error")]
    struct NoteError;

    #[async_trait]
    impl ActorEntity for Note {
        type Id = u32;
        type Create = NoteCreate;
        type Action = NoteAction;
        type ActionResult = usize;
        type Context = ();
        type Error = NoteError;

        fn from_create_params(id: u32, params: NoteCreate) -> Result<Self, Self::Error> {
            Ok(Self { id, text: params.text })
        }

        async fn handle_action(&mut self, action: NoteAction, _: &()) -> Result<usize, Self::Error> {
            let NoteAction::Append(more) = action;
            self.text.push_str(&more);
            Ok(self.text.len())
        }
    }

    #[tokio::test]
    async fn test_raw_channel_mock() {
        let (client, mut receiver) = create_mock_client::<Note>(10);

        let task = tokio::spawn(async move {
            client.perform_action(3, NoteAction::Append("!".into())).await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, 3);
        assert!(matches!(action, NoteAction::Append(s) if s == "!"));
        responder.send(Ok(6)).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 6);
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_create().return_ok(1);
        mock.expect_get(1).return_ok(Some(Note { id: 1, text: "hi".into() }));
        mock.expect_query().return_ok(vec![]);
        mock.expect_action(1).return_err(FrameworkError::NotFound("1".into()));

        let client = mock.client();
        assert_eq!(client.create(NoteCreate { text: "hi".into() }).await.unwrap(), 1);
        assert_eq!(client.get(1).await.unwrap().unwrap().text, "hi");
        assert!(client
            .query(crate::framework::Filter::all())
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            client.perform_action(1, NoteAction::Append("x".into())).await,
            Err(FrameworkError::NotFound(_))
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_request_is_reported() {
        let mut mock = MockClient::<Note>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().create(NoteCreate { text: "x".into() }).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
