//! # Generic Messages
//!
//! Request types exchanged between `ResourceClient` and `ResourceActor`.

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use std::fmt;
use tokio::sync::oneshot;

/// One-shot reply channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Row predicate evaluated inside the actor task.
pub struct Filter<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    /// Matches every row.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, row: &T) -> bool {
        (self.0)(row)
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Message sent to a table actor.
///
/// - **Create**: insert a row built from [`ActorEntity::Create`].
/// - **Get**: read one row by id.
/// - **Query**: read every row matching a [`Filter`], in id order.
/// - **Action**: apply an [`ActorEntity::Action`] transition to one row.
///
/// Because the actor handles one message at a time, an `Action` observes and writes the row
/// without any other request interleaving. Status checks inside an action are therefore
/// compare-and-set.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
