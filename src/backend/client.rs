//! Thin client for the hosted table-query API.
//!
//! Every persistence operation in the app reduces to one of four calls
//! here: select with equality filters, insert (single row or batch),
//! update by id, delete by id. Rows are consumed as eventually-consistent
//! remote resources — no local cache, no version checks, last write wins.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::backend::auth::AuthClient;
use crate::config::BackendConfig;
use crate::error::BackendError;

/// One equality filter on a select: `(column, value)`.
pub type EqFilter<'a> = (&'a str, String);

/// REST client for the backend's table endpoints.
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
    auth: Arc<AuthClient>,
}

impl BackendClient {
    pub fn new(config: BackendConfig, auth: Arc<AuthClient>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            auth,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url)
    }

    /// Attach the anon key plus the session bearer token (anon fallback
    /// when signed out — row-level security then scopes visibility).
    async fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = req.header("apikey", self.config.anon_key.expose_secret());
        match self.auth.access_token().await {
            Some(token) => req.bearer_auth(token.expose_secret()),
            None => req.bearer_auth(self.config.anon_key.expose_secret()),
        }
    }

    async fn ensure_ok(
        op: &str,
        table: &str,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(BackendError::Rejected {
            op: op.to_string(),
            table: table.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode_rows<T: DeserializeOwned>(
        table: &str,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, BackendError> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode {
            table: table.to_string(),
            message: e.to_string(),
        })
    }

    /// Select rows matching every given equality filter.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[EqFilter<'_>],
    ) -> Result<Vec<T>, BackendError> {
        let mut query: Vec<(String, String)> = vec![("select".into(), "*".into())];
        for (column, value) in filters {
            query.push(((*column).to_string(), format!("eq.{value}")));
        }

        let req = self.http.get(self.table_url(table)).query(&query);
        let resp = self.authed(req).await.send().await?;
        let rows = Self::decode_rows(table, Self::ensure_ok("select", table, resp).await?).await?;
        debug!(table, "Selected rows");
        Ok(rows)
    }

    /// Insert one row or a batch, returning the stored representation.
    pub async fn insert<T, R>(&self, table: &str, rows: &T) -> Result<Vec<R>, BackendError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows);
        let resp = self.authed(req).await.send().await?;
        let stored = Self::decode_rows(table, Self::ensure_ok("insert", table, resp).await?).await?;
        debug!(table, "Inserted rows");
        Ok(stored)
    }

    /// Update the row with the given id, returning the stored representation.
    pub async fn update<T, R>(&self, table: &str, id: Uuid, row: &T) -> Result<Vec<R>, BackendError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let req = self
            .http
            .patch(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(row);
        let resp = self.authed(req).await.send().await?;
        let stored = Self::decode_rows(table, Self::ensure_ok("update", table, resp).await?).await?;
        debug!(table, id = %id, "Updated row");
        Ok(stored)
    }

    /// Delete the row with the given id.
    pub async fn delete(&self, table: &str, id: Uuid) -> Result<(), BackendError> {
        let req = self
            .http
            .delete(self.table_url(table))
            .query(&[("id", format!("eq.{id}"))]);
        let resp = self.authed(req).await.send().await?;
        Self::ensure_ok("delete", table, resp).await?;
        debug!(table, id = %id, "Deleted row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_client() -> BackendClient {
        let config = BackendConfig {
            base_url: "https://project.example.co".to_string(),
            anon_key: SecretString::from("anon-key"),
        };
        let auth = Arc::new(AuthClient::new(config.clone()));
        BackendClient::new(config, auth)
    }

    #[test]
    fn table_url_layout() {
        let client = test_client();
        assert_eq!(
            client.table_url("contacts"),
            "https://project.example.co/rest/v1/contacts"
        );
    }

    #[tokio::test]
    async fn select_against_unreachable_host_is_an_http_error() {
        let config = BackendConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            anon_key: SecretString::from("anon-key"),
        };
        let auth = Arc::new(AuthClient::new(config.clone()));
        let client = BackendClient::new(config, auth);

        let result: Result<Vec<crate::model::Contact>, _> = client.select("contacts", &[]).await;
        assert!(matches!(result, Err(BackendError::Http(_))));
    }
}
