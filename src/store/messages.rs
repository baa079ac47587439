//! MessageStore — outbound message submission to the `messages` table.
//!
//! The remote endpoint is the source of truth for delivery; this store
//! only inserts. It is the production `MessageSink` for the dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::BackendClient;
use crate::dispatch::MessageSink;
use crate::error::BackendError;
use crate::model::Message;

const TABLE: &str = "messages";

pub struct MessageStore {
    backend: Arc<BackendClient>,
}

impl MessageStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl MessageSink for MessageStore {
    /// Insert a batch in one call. Acceptance is all-or-nothing as observed
    /// by the caller — the transport reports no per-item results.
    async fn send_batch(&self, messages: &[Message]) -> Result<Vec<Message>, BackendError> {
        let stored: Vec<Message> = self.backend.insert(TABLE, messages).await?;
        debug!(count = stored.len(), "Message batch submitted");
        Ok(stored)
    }

    /// Insert a single message, returning the stored row.
    async fn send_one(&self, message: &Message) -> Result<Message, BackendError> {
        let rows: Vec<Message> = self.backend.insert(TABLE, message).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "insert".into(),
            table: TABLE.into(),
        })
    }
}
