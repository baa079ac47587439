//! FormStore — forms, form fields, and the capture-webhook reference.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::error::BackendError;
use crate::model::{Form, FormField};
use crate::template;

const FORMS: &str = "forms";
const FIELDS: &str = "form_fields";

/// The implicitly required capture field. Every form gets one, and it can
/// never be deleted through the field list.
pub const PHONE_FIELD: &str = "phoneNumber";

pub struct FormStore {
    backend: Arc<BackendClient>,
}

impl FormStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    // ── Forms ───────────────────────────────────────────────────────

    /// Forms owned by the given user.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Form>, BackendError> {
        self.backend
            .select(FORMS, &[("user_id", user_id.to_string())])
            .await
    }

    pub async fn create(&self, form: &Form) -> Result<Form, BackendError> {
        let rows: Vec<Form> = self.backend.insert(FORMS, form).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "insert".into(),
            table: FORMS.into(),
        })
    }

    /// Persist a single field-level mutation. Forms have no draft state —
    /// every toggle or edit lands here immediately.
    pub async fn update(&self, form: &Form) -> Result<Form, BackendError> {
        let rows: Vec<Form> = self.backend.update(FORMS, form.id, form).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "update".into(),
            table: FORMS.into(),
        })
    }

    /// Delete a form together with its fields. The cascade is
    /// client-orchestrated — the server does not enforce it.
    pub async fn delete_cascade(&self, form_id: Uuid) -> Result<(), BackendError> {
        for field in self.fields(form_id).await? {
            self.delete_field(field.id).await?;
        }
        debug!(form = %form_id, "Form fields removed, deleting form");
        self.backend.delete(FORMS, form_id).await
    }

    // ── Form fields ─────────────────────────────────────────────────

    pub async fn fields(&self, form_id: Uuid) -> Result<Vec<FormField>, BackendError> {
        self.backend
            .select(FIELDS, &[("form_id", form_id.to_string())])
            .await
    }

    pub async fn create_field(&self, field: &FormField) -> Result<FormField, BackendError> {
        let rows: Vec<FormField> = self.backend.insert(FIELDS, field).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "insert".into(),
            table: FIELDS.into(),
        })
    }

    pub async fn update_field(&self, field: &FormField) -> Result<FormField, BackendError> {
        let rows: Vec<FormField> = self.backend.update(FIELDS, field.id, field).await?;
        rows.into_iter().next().ok_or_else(|| BackendError::MissingRow {
            op: "update".into(),
            table: FIELDS.into(),
        })
    }

    pub async fn delete_field(&self, id: Uuid) -> Result<(), BackendError> {
        self.backend.delete(FIELDS, id).await
    }

    /// Load a form's fields, creating the required `phoneNumber` field when
    /// it is missing. Called when a form is first opened.
    pub async fn ensure_phone_field(&self, form_id: Uuid) -> Result<Vec<FormField>, BackendError> {
        let mut fields = self.fields(form_id).await?;
        if !fields.iter().any(|f| f.name == PHONE_FIELD) {
            debug!(form = %form_id, "Creating required phoneNumber field");
            let field = FormField::new(PHONE_FIELD, form_id);
            fields.push(self.create_field(&field).await?);
        }
        Ok(fields)
    }
}

// ── Capture webhook reference ───────────────────────────────────────
//
// Documentation-only: external capture sources POST here, this client
// never calls the endpoint itself.

/// The webhook URL for a form.
pub fn webhook_url(api_base: &str, form_id: Uuid) -> String {
    format!(
        "{}/v1/forms/{form_id}/webhook",
        api_base.trim_end_matches('/')
    )
}

/// Example request body for the capture webhook: one key per field token
/// plus the mandatory `phoneNumber` key, de-duplicated into valid JSON.
pub fn webhook_example_body(fields: &[FormField]) -> String {
    let mut body = serde_json::Map::new();
    for field in fields {
        body.insert(
            template::to_camel_token(&field.name),
            serde_json::Value::String(String::new()),
        );
    }
    body.insert(
        PHONE_FIELD.to_string(),
        serde_json::Value::String(String::new()),
    );
    serde_json::to_string_pretty(&serde_json::Value::Object(body))
        .unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_url_uses_lowercase_form_id() {
        let id = Uuid::new_v4();
        let url = webhook_url("https://api.outreach.app/", id);
        assert_eq!(
            url,
            format!("https://api.outreach.app/v1/forms/{}/webhook", id)
        );
        assert_eq!(url, url.to_lowercase());
    }

    #[test]
    fn webhook_example_includes_field_tokens_and_phone() {
        let form_id = Uuid::new_v4();
        let fields = vec![
            FormField::new("First Name", form_id),
            FormField::new("Email", form_id),
        ];

        let body = webhook_example_body(&fields);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let object = parsed.as_object().unwrap();

        assert!(object.contains_key("firstName"));
        assert!(object.contains_key("email"));
        assert!(object.contains_key("phoneNumber"));
        assert_eq!(object.len(), 3);
    }

    #[test]
    fn webhook_example_deduplicates_phone_field() {
        let form_id = Uuid::new_v4();
        let fields = vec![
            FormField::new(PHONE_FIELD, form_id),
            FormField::new("First Name", form_id),
        ];

        let body = webhook_example_body(&fields);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let object = parsed.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert!(object.contains_key("phoneNumber"));
        assert!(object.contains_key("firstName"));
    }

    #[test]
    fn webhook_example_with_no_fields_still_has_phone() {
        let body = webhook_example_body(&[]);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.as_object().unwrap().len(), 1);
        assert!(parsed.as_object().unwrap().contains_key("phoneNumber"));
    }
}
