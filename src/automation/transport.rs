//! Transport seam for the campaign API endpoints.
//!
//! The production implementation uses reqwest; tests script statuses and
//! count attempts through the same trait.

use std::time::Duration;

use async_trait::async_trait;

/// A fetched HTTP response, reduced to what the adapters need.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// HTTP access used by the automation clients.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedResponse, String>;

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<FetchedResponse, String>;
}

/// reqwest-backed transport. Requests are sent with cache-busting headers —
/// the automation contract wants a fresh result on every call.
pub struct HttpTransport {
    client: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl HttpTransport {
    /// Transport with the library's default timeouts.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            request_timeout: None,
        }
    }

    /// Transport with a fixed per-request timeout.
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            request_timeout: Some(request_timeout),
        }
    }

    fn apply_timeout(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.request_timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<FetchedResponse, String> {
        let req = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        let resp = self
            .apply_timeout(req)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| e.to_string())?.to_vec();
        Ok(FetchedResponse { status, body })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<FetchedResponse, String> {
        let req = self.client.post(url).json(body);
        let resp = self
            .apply_timeout(req)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| e.to_string())?.to_vec();
        Ok(FetchedResponse { status, body })
    }
}
