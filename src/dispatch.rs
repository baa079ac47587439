//! Bulk message dispatch — render one message per recipient, submit as a
//! single batch.
//!
//! Acceptance is all-or-nothing as observed by the caller: the transport
//! reports no per-item results, so `dispatch` never guesses at partial
//! success. The per-item path exists for callers that choose to retry a
//! rejected batch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::BackendError;
use crate::model::{Contact, Message};
use crate::template;

/// Where rendered messages are submitted — the messages table in
/// production, scripted fakes in tests.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Submit a batch in one call.
    async fn send_batch(&self, messages: &[Message]) -> Result<Vec<Message>, BackendError>;

    /// Submit a single message.
    async fn send_one(&self, message: &Message) -> Result<Message, BackendError>;
}

/// A recipient the dispatcher could not deliver for.
#[derive(Debug, Clone)]
pub struct DispatchFailure {
    pub recipient: Contact,
    pub reason: String,
}

/// What a dispatch attempt produced.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub sent: Vec<Message>,
    pub failed: Vec<DispatchFailure>,
}

impl DispatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The field record a contact exposes to templates.
pub fn contact_fields(contact: &Contact) -> HashMap<String, String> {
    HashMap::from([
        ("firstName".to_string(), contact.first_name.clone()),
        ("lastName".to_string(), contact.last_name.clone()),
        ("phoneNumber".to_string(), contact.phone_number.clone()),
    ])
}

/// Renders and submits personalized messages for a set of recipients.
pub struct BulkDispatcher {
    sink: Arc<dyn MessageSink>,
}

impl BulkDispatcher {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }

    /// One fresh message per recipient. Identities are new on every
    /// invocation, so caller-level retry of the same user action produces
    /// distinct inserts — suppressing duplicate sends is the caller's job.
    fn build_messages(&self, recipients: &[Contact], template: &str, sender: Uuid) -> Vec<Message> {
        recipients
            .iter()
            .map(|contact| {
                let body = template::render(template, &contact_fields(contact));
                Message::new(sender, contact.phone_number.clone(), body)
            })
            .collect()
    }

    /// Render and submit one personalized message per recipient as a single
    /// batch. An empty recipient list performs no network call. On rejection
    /// every recipient is reported failed with the batch reason and no
    /// automatic per-item retry happens here — the caller decides whether to
    /// fall back to [`dispatch_individually`](Self::dispatch_individually).
    pub async fn dispatch(
        &self,
        recipients: &[Contact],
        template: &str,
        sender: Uuid,
    ) -> DispatchOutcome {
        if recipients.is_empty() {
            return DispatchOutcome::default();
        }

        let messages = self.build_messages(recipients, template, sender);
        match self.sink.send_batch(&messages).await {
            Ok(accepted) => {
                debug!(count = accepted.len(), "Batch send accepted");
                DispatchOutcome {
                    sent: accepted,
                    failed: Vec::new(),
                }
            }
            Err(e) => {
                warn!(error = %e, recipients = recipients.len(), "Batch send rejected");
                let reason = e.to_string();
                DispatchOutcome {
                    sent: Vec::new(),
                    failed: recipients
                        .iter()
                        .cloned()
                        .map(|recipient| DispatchFailure {
                            recipient,
                            reason: reason.clone(),
                        })
                        .collect(),
                }
            }
        }
    }

    /// Per-item submission, sequential and in input order. For callers
    /// retrying after a batch rejection.
    pub async fn dispatch_individually(
        &self,
        recipients: &[Contact],
        template: &str,
        sender: Uuid,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for contact in recipients {
            let body = template::render(template, &contact_fields(contact));
            let message = Message::new(sender, contact.phone_number.clone(), body);
            match self.sink.send_one(&message).await {
                Ok(accepted) => outcome.sent.push(accepted),
                Err(e) => {
                    debug!(phone = %contact.phone_number, error = %e, "Single send rejected");
                    outcome.failed.push(DispatchFailure {
                        recipient: contact.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }
}
