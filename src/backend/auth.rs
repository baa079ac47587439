//! Email/password auth against the hosted backend.
//!
//! The session lives in one explicit `AuthClient` handed to the components
//! that need it, and is refreshed only on defined triggers (sign-in,
//! sign-out) — never implicitly per screen render.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::BackendError;

/// The authenticated user inside a session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: SecretString,
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Auth API client holding the current session.
pub struct AuthClient {
    http: reqwest::Client,
    config: BackendConfig,
    session: RwLock<Option<Session>>,
}

impl AuthClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session: RwLock::new(None),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    /// Sign in with email and password, storing the session on success.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, BackendError> {
        let resp = self
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.config.anon_key.expose_secret())
            .json(&serde_json::json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::AuthFailed(format!(
                "status {}: {body}",
                status.as_u16()
            )));
        }

        let session: Session = resp.json().await?;
        info!(user = %session.user.id, "Signed in");
        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Sign out, clearing the stored session. The local session is dropped
    /// even when the server-side revocation call fails.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let token = {
            self.session
                .read()
                .await
                .as_ref()
                .map(|s| s.access_token.clone())
        };

        if let Some(token) = token {
            let resp = self
                .http
                .post(self.auth_url("logout"))
                .header("apikey", self.config.anon_key.expose_secret())
                .bearer_auth(token.expose_secret())
                .send()
                .await?;
            if !resp.status().is_success() {
                debug!(status = %resp.status(), "Logout returned non-success");
            }
        }

        *self.session.write().await = None;
        info!("Signed out");
        Ok(())
    }

    /// Request a password-reset email.
    pub async fn reset_password(&self, email: &str) -> Result<(), BackendError> {
        let resp = self
            .http
            .post(self.auth_url("recover"))
            .header("apikey", self.config.anon_key.expose_secret())
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::AuthFailed(format!(
                "recover failed: status {}: {body}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    /// The current session, if signed in.
    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Access token attached to table-API requests.
    pub(crate) async fn access_token(&self) -> Option<SecretString> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// The signed-in user's id.
    pub async fn user_id(&self) -> Result<Uuid, BackendError> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user.id)
            .ok_or(BackendError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BackendConfig {
        BackendConfig {
            base_url: "https://project.example.co".to_string(),
            anon_key: SecretString::from("anon-key"),
        }
    }

    #[test]
    fn auth_url_layout() {
        let auth = AuthClient::new(test_config());
        assert_eq!(
            auth.auth_url("token"),
            "https://project.example.co/auth/v1/token"
        );
        assert_eq!(
            auth.auth_url("logout"),
            "https://project.example.co/auth/v1/logout"
        );
    }

    #[tokio::test]
    async fn no_session_until_sign_in() {
        let auth = AuthClient::new(test_config());
        assert!(auth.current_session().await.is_none());
        assert!(matches!(
            auth.user_id().await,
            Err(BackendError::NotAuthenticated)
        ));
    }

    #[test]
    fn session_decodes_from_token_response() {
        let raw = format!(
            r#"{{
                "access_token": "jwt-token",
                "token_type": "bearer",
                "expires_in": 3600,
                "refresh_token": "refresh",
                "user": {{ "id": "{}", "email": "amy@example.com" }}
            }}"#,
            Uuid::new_v4()
        );
        let session: Session = serde_json::from_str(&raw).unwrap();
        assert_eq!(session.access_token.expose_secret(), "jwt-token");
        assert_eq!(session.expires_in, Some(3600));
        assert_eq!(session.user.email.as_deref(), Some("amy@example.com"));
    }
}
