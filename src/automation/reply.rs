//! Reply notification — tells the campaign API that a contact replied.

use std::sync::Arc;

use tracing::debug;

use crate::automation::transport::{ApiTransport, HttpTransport};
use crate::config::ApiConfig;

/// Client for the reply endpoint. Best-effort by contract: a missing key
/// or any non-200 response is a silent no-op.
pub struct ReplyClient {
    api: ApiConfig,
    transport: Arc<dyn ApiTransport>,
}

impl ReplyClient {
    /// Default transport timeouts apply — only the poll path carries
    /// explicit bounds.
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            transport: Arc::new(HttpTransport::new()),
        }
    }

    pub fn with_transport(api: ApiConfig, transport: Arc<dyn ApiTransport>) -> Self {
        Self { api, transport }
    }

    fn endpoint_url(&self, api_key: &str) -> Option<String> {
        let mut url = reqwest::Url::parse(&self.api.base_url).ok()?;
        url.path_segments_mut().ok()?.extend(["v1", "reply", api_key]);
        Some(url.to_string())
    }

    /// Record that `phone_number` replied, flipping the contact hot on the
    /// server side.
    pub async fn update_contact(&self, api_key: &str, phone_number: &str) {
        if api_key.trim().is_empty() {
            debug!("No API key stored, skipping reply update");
            return;
        }
        let Some(url) = self.endpoint_url(api_key) else {
            debug!("Could not build reply URL");
            return;
        };

        let body = serde_json::json!({ "phoneNumber": phone_number });
        match self.transport.post_json(&url, &body).await {
            Ok(response) if response.status == 200 => {
                debug!(phone = phone_number, "Reply recorded");
            }
            Ok(response) => {
                debug!(status = response.status, "Reply update ignored");
            }
            Err(e) => {
                debug!(error = %e, "Reply update failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::automation::transport::FetchedResponse;

    /// Transport that records posted bodies and replies with a fixed status.
    struct RecordingTransport {
        status: u16,
        calls: AtomicUsize,
        bodies: Mutex<Vec<serde_json::Value>>,
    }

    impl RecordingTransport {
        fn with_status(status: u16) -> Arc<Self> {
            Arc::new(Self {
                status,
                calls: AtomicUsize::new(0),
                bodies: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ApiTransport for RecordingTransport {
        async fn get(&self, _url: &str) -> Result<FetchedResponse, String> {
            Err("unused".to_string())
        }

        async fn post_json(
            &self,
            _url: &str,
            body: &serde_json::Value,
        ) -> Result<FetchedResponse, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.bodies.lock().unwrap().push(body.clone());
            Ok(FetchedResponse {
                status: self.status,
                body: Vec::new(),
            })
        }
    }

    fn client(transport: Arc<RecordingTransport>) -> ReplyClient {
        ReplyClient::with_transport(ApiConfig::default(), transport)
    }

    #[tokio::test]
    async fn blank_key_makes_no_network_call() {
        let transport = RecordingTransport::with_status(200);
        client(Arc::clone(&transport))
            .update_contact("", "+15550001111")
            .await;
        client(Arc::clone(&transport))
            .update_contact("   ", "+15550001111")
            .await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn posts_phone_number_body() {
        let transport = RecordingTransport::with_status(200);
        client(Arc::clone(&transport))
            .update_contact("validkey", "+15550001111")
            .await;

        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        let bodies = transport.bodies.lock().unwrap();
        assert_eq!(bodies[0], serde_json::json!({"phoneNumber": "+15550001111"}));
    }

    #[tokio::test]
    async fn non_200_is_a_silent_no_op() {
        for status in [401, 404, 429, 500] {
            let transport = RecordingTransport::with_status(status);
            client(Arc::clone(&transport))
                .update_contact("key", "+1555")
                .await;
            assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        }
    }
}
