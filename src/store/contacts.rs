//! ContactStore — CRUD for the `contacts` table.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::error::BackendError;
use crate::model::{Contact, ContactStatus};

const TABLE: &str = "contacts";

/// An entry handed over by the OS contact picker. The picker itself is an
/// external collaborator — this is just its output shape.
#[derive(Debug, Clone)]
pub struct PickedContact {
    pub given_name: String,
    pub family_name: String,
    pub phone_number: Option<String>,
}

pub struct ContactStore {
    backend: Arc<BackendClient>,
}

impl ContactStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Fetch every contact visible to the session. Status filtering happens
    /// client-side on the wholesale result.
    pub async fn list(&self) -> Result<Vec<Contact>, BackendError> {
        self.backend.select(TABLE, &[]).await
    }

    /// Contacts currently in the given status.
    pub async fn list_by_status(
        &self,
        status: ContactStatus,
    ) -> Result<Vec<Contact>, BackendError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|c| c.status == status)
            .collect())
    }

    pub async fn create(&self, contact: &Contact) -> Result<Contact, BackendError> {
        let rows: Vec<Contact> = self.backend.insert(TABLE, contact).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "insert".into(),
            table: TABLE.into(),
        })
    }

    pub async fn update(&self, contact: &Contact) -> Result<Contact, BackendError> {
        let rows: Vec<Contact> = self.backend.update(TABLE, contact.id, contact).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "update".into(),
            table: TABLE.into(),
        })
    }

    /// Move a contact to the given status, overwriting `last_updated`.
    pub async fn set_status(
        &self,
        contact: &Contact,
        status: ContactStatus,
    ) -> Result<Contact, BackendError> {
        let mut updated = contact.clone();
        updated.status = status;
        updated.touch();
        debug!(id = %contact.id, status = %status, "Toggling contact status");
        self.update(&updated).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BackendError> {
        self.backend.delete(TABLE, id).await
    }

    /// Persist device-picker output as cold contacts. Entries without a
    /// phone number are skipped; duplicates are allowed by design of the
    /// contacts table.
    pub async fn import_picked(
        &self,
        picked: &[PickedContact],
        form_id: Uuid,
    ) -> Result<Vec<Contact>, BackendError> {
        let mut created = Vec::new();
        for entry in picked {
            let Some(phone) = entry.phone_number.as_deref().filter(|p| !p.is_empty()) else {
                debug!(name = %entry.given_name, "Skipping picked contact without phone number");
                continue;
            };
            let contact = Contact::new(
                &entry.given_name,
                &entry.family_name,
                phone,
                ContactStatus::Cold,
                form_id,
            );
            created.push(self.create(&contact).await?);
        }
        Ok(created)
    }
}
