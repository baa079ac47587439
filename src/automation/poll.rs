//! Poll adapter — "get pending messages" for the shortcut runtime.
//!
//! The caller contract: always return syntactically valid JSON text within
//! a bounded time budget, no matter what the network does. Rate limiting
//! gets exactly one retry after a fixed delay, via an explicit attempt
//! loop — never open-ended recursion driven by the server's responses.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::automation::transport::{ApiTransport, HttpTransport};
use crate::config::{ApiConfig, PollConfig};
use crate::model::Message;

/// Neutral result returned on every soft failure.
const EMPTY_RESULT: &str = "[]";

/// Client for the poll and queued-messages endpoints.
pub struct PollClient {
    api: ApiConfig,
    config: PollConfig,
    transport: Arc<dyn ApiTransport>,
}

impl PollClient {
    pub fn new(api: ApiConfig, config: PollConfig) -> Self {
        let transport = Arc::new(HttpTransport::with_timeout(config.request_timeout));
        Self {
            api,
            config,
            transport,
        }
    }

    /// Client over a custom transport. Tests use this to script responses
    /// and count attempts.
    pub fn with_transport(
        api: ApiConfig,
        config: PollConfig,
        transport: Arc<dyn ApiTransport>,
    ) -> Self {
        Self {
            api,
            config,
            transport,
        }
    }

    /// Endpoint URL with the key as a percent-encoded path segment.
    fn endpoint_url(&self, endpoint: &str, api_key: &str) -> Option<String> {
        let mut url = reqwest::Url::parse(&self.api.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .extend(["v1", endpoint, api_key]);
        Some(url.to_string())
    }

    /// Fetch pending messages as JSON text. Never errors: every failure
    /// path yields the empty-array text. A blank key short-circuits with
    /// zero network attempts; otherwise at most `max_attempts` are made,
    /// all inside the overall resource budget.
    pub async fn poll(&self, api_key: &str) -> String {
        if api_key.trim().is_empty() {
            debug!("No API key, skipping poll");
            return EMPTY_RESULT.to_string();
        }
        let Some(url) = self.endpoint_url("poll", api_key) else {
            warn!("Could not build poll URL");
            return EMPTY_RESULT.to_string();
        };

        match tokio::time::timeout(self.config.resource_timeout, self.poll_attempts(&url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Poll exceeded overall time budget");
                EMPTY_RESULT.to_string()
            }
        }
    }

    /// Bounded attempt loop: one retry after a fixed delay on 429,
    /// everything else resolves on the first attempt.
    async fn poll_attempts(&self, url: &str) -> String {
        for attempt in 1..=self.config.max_attempts {
            let response = match self.transport.get(url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Poll request failed");
                    return EMPTY_RESULT.to_string();
                }
            };

            match response.status {
                200 => {
                    return match String::from_utf8(response.body) {
                        Ok(body) => body,
                        Err(_) => {
                            warn!("Poll body was not valid UTF-8");
                            EMPTY_RESULT.to_string()
                        }
                    };
                }
                401 | 403 => {
                    debug!(status = response.status, "Poll credential rejected");
                    return EMPTY_RESULT.to_string();
                }
                429 if attempt < self.config.max_attempts => {
                    debug!(attempt, "Poll rate limited, backing off");
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                status => {
                    debug!(status, "Poll returned unexpected status");
                    return EMPTY_RESULT.to_string();
                }
            }
        }
        EMPTY_RESULT.to_string()
    }

    /// Typed variant for the queued-messages screen: decodes the array and
    /// soft-fails to empty on any error.
    pub async fn queued_messages(&self, api_key: &str) -> Vec<Message> {
        if api_key.trim().is_empty() {
            debug!("No API key, skipping queued-messages fetch");
            return Vec::new();
        }
        let Some(url) = self.endpoint_url("messages", api_key) else {
            return Vec::new();
        };

        let fetch = async {
            match self.transport.get(&url).await {
                Ok(response) if response.status == 200 => {
                    serde_json::from_slice(&response.body).unwrap_or_else(|e| {
                        warn!(error = %e, "Failed to decode queued messages");
                        Vec::new()
                    })
                }
                Ok(response) => {
                    debug!(status = response.status, "Queued-messages fetch returned non-200");
                    Vec::new()
                }
                Err(e) => {
                    warn!(error = %e, "Queued-messages fetch failed");
                    Vec::new()
                }
            }
        };

        tokio::time::timeout(self.config.resource_timeout, fetch)
            .await
            .unwrap_or_default()
    }
}
