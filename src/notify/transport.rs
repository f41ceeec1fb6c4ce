//! Outbound delivery to chats.

use crate::flow::Reply;
use crate::model::ChatId;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    /// The platform refused the message (chat blocked the bot, chat deleted).
    #[error("delivery to {chat} rejected: {reason}")]
    Rejected { chat: ChatId, reason: String },

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Pushes a message to a chat outside of a request/reply exchange.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), DeliveryError>;
}

/// Writes pushes to stdout, one block per message.
#[derive(Debug, Default)]
pub struct ConsoleTransport;

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), DeliveryError> {
        let block = format!("[push -> {chat}] {reply}\n");
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(block.as_bytes())
            .await
            .map_err(|e| DeliveryError::Unavailable(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| DeliveryError::Unavailable(e.to_string()))
    }
}

/// Test transport: records every successful push and fails on demand for chosen chats.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(ChatId, Reply)>>,
    failing: Mutex<HashSet<ChatId>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later push to `chat` fails with [`DeliveryError::Rejected`].
    pub fn fail_for(&self, chat: ChatId) {
        lock(&self.failing).insert(chat);
    }

    pub fn sent(&self) -> Vec<(ChatId, Reply)> {
        lock(&self.sent).clone()
    }

    pub fn sent_to(&self, chat: ChatId) -> Vec<Reply> {
        lock(&self.sent)
            .iter()
            .filter(|(to, _)| *to == chat)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.sent).clear();
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, chat: ChatId, reply: &Reply) -> Result<(), DeliveryError> {
        if lock(&self.failing).contains(&chat) {
            return Err(DeliveryError::Rejected {
                chat,
                reason: "blocked by user".into(),
            });
        }
        lock(&self.sent).push((chat, reply.clone()));
        Ok(())
    }
}
