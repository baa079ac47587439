//! ApiKeyStore — automation credentials in the `api_keys` table.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::BackendClient;
use crate::error::BackendError;
use crate::model::ApiKey;

const TABLE: &str = "api_keys";

pub struct ApiKeyStore {
    backend: Arc<BackendClient>,
}

impl ApiKeyStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// First matching key for the user, if any. One active key per user is
    /// assumed; an absent key is a normal state, not an error.
    pub async fn get(&self, user_id: Uuid) -> Result<Option<ApiKey>, BackendError> {
        let rows: Vec<ApiKey> = self
            .backend
            .select(TABLE, &[("user_id", user_id.to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(&self, key: &ApiKey) -> Result<ApiKey, BackendError> {
        let rows: Vec<ApiKey> = self.backend.insert(TABLE, key).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "insert".into(),
            table: TABLE.into(),
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
        self.backend.delete(TABLE, id).await
    }
}
