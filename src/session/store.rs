//! Keyed session storage.

use super::Session;
use crate::model::ChatId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Narrow get/set/clear storage for sessions, keyed by chat.
///
/// Implementations only store; flow ordering per chat is the router's concern.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, chat: ChatId) -> Option<Session>;

    async fn set(&self, chat: ChatId, session: Session);

    async fn clear(&self, chat: ChatId);

    /// Drops sessions last touched before `before`. Returns how many were dropped.
    async fn purge_idle(&self, before: DateTime<Utc>) -> usize;
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<ChatId, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, chat: ChatId) -> Option<Session> {
        self.sessions.get(&chat).map(|s| s.clone())
    }

    async fn set(&self, chat: ChatId, session: Session) {
        self.sessions.insert(chat, session);
    }

    async fn clear(&self, chat: ChatId) {
        self.sessions.remove(&chat);
    }

    async fn purge_idle(&self, before: DateTime<Utc>) -> usize {
        let start = self.sessions.len();
        self.sessions.retain(|_, s| s.touched_at >= before);
        start.saturating_sub(self.sessions.len())
    }
}
