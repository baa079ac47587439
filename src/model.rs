//! Row types for the hosted backend tables.
//!
//! Field renames mirror the backend's exact column names. Identity columns
//! are deserialized but never serialized — the backend assigns them, so
//! writes always omit `id`.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Contact ─────────────────────────────────────────────────────────

/// Contact temperature. Manual toggle only, bidirectional, no history
/// beyond the `last_updated` overwrite on each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Hot,
    Cold,
}

impl ContactStatus {
    /// The other temperature.
    pub fn toggled(self) -> Self {
        match self {
            Self::Hot => Self::Cold,
            Self::Cold => Self::Hot,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cold => "cold",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hot" => Ok(Self::Hot),
            "cold" => Ok(Self::Cold),
            other => Err(format!("unknown contact status: {other}")),
        }
    }
}

/// A captured lead. Duplicates are permitted — submissions never merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub status: ContactStatus,
    /// Epoch seconds, overwritten on every mutation.
    pub last_updated: i64,
    pub form_id: Uuid,
}

impl Contact {
    pub fn new(
        first_name: &str,
        last_name: &str,
        phone_number: &str,
        status: ContactStatus,
        form_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone_number: phone_number.to_string(),
            status,
            last_updated: Utc::now().timestamp(),
            form_id,
        }
    }

    /// Overwrite `last_updated` with the current time.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now().timestamp();
    }
}

// ── Form ────────────────────────────────────────────────────────────

/// Unit for the scheduled-send delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

/// Kind of attachment a form can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Gif,
}

/// A message-capture form. Mutated field by field, each change persisted
/// immediately — there is no local draft state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub name: String,
    pub message_template: String,
    #[serde(rename = "enableCapturing")]
    pub enable_capturing: bool,
    #[serde(rename = "autoFollowUp")]
    pub auto_follow_up: bool,
    #[serde(rename = "postLater")]
    pub post_later: bool,
    #[serde(rename = "postLaterType")]
    pub post_later_type: DelayUnit,
    #[serde(rename = "postLaterValue")]
    pub post_later_value: i64,
    #[serde(rename = "includeAttachment")]
    pub include_attachment: bool,
    #[serde(rename = "attachmentType")]
    pub attachment_type: AttachmentKind,
    #[serde(rename = "attachmentValue")]
    pub attachment_value: String,
    pub user_id: Uuid,
}

impl Form {
    /// A fresh form with the product defaults: empty template, capturing
    /// off, auto-follow-up on, no scheduled send, no attachment.
    pub fn new(name: &str, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            message_template: String::new(),
            enable_capturing: false,
            auto_follow_up: true,
            post_later: false,
            post_later_type: DelayUnit::Minutes,
            post_later_value: 0,
            include_attachment: false,
            attachment_type: AttachmentKind::Gif,
            attachment_value: String::new(),
            user_id,
        }
    }
}

/// A capture field owned by a form. Field names double as quick-insert
/// template tokens and as webhook body keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub name: String,
    pub form_id: Uuid,
}

impl FormField {
    pub fn new(name: &str, form_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            form_id,
        }
    }
}

// ── Message ─────────────────────────────────────────────────────────

/// An outbound message row. Constructed immediately before a send; the
/// remote endpoint owns delivery state, this client holds none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub message: String,
    #[serde(rename = "useAttachment", default)]
    pub use_attachment: bool,
    #[serde(rename = "attachmentType", default)]
    pub attachment_type: String,
    #[serde(rename = "attachmentValue", default)]
    pub attachment_value: String,
}

impl Message {
    /// A plain message with no attachment.
    pub fn new(user_id: Uuid, phone_number: String, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            phone_number,
            message,
            use_attachment: false,
            attachment_type: String::new(),
            attachment_value: String::new(),
        }
    }
}

// ── API key ─────────────────────────────────────────────────────────

/// An automation credential. One active key per user is assumed; lookups
/// take the first match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub key_value: String,
    pub user_id: Uuid,
    /// Epoch milliseconds of the key's last use, written by the server.
    #[serde(rename = "lastUsed")]
    pub last_used: i64,
}

// ── Gif ─────────────────────────────────────────────────────────────

/// A default attachment catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gif {
    pub uuid: Uuid,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(ContactStatus::Hot.toggled(), ContactStatus::Cold);
        assert_eq!(ContactStatus::Cold.toggled(), ContactStatus::Hot);
    }

    #[test]
    fn status_toggle_round_trips() {
        for status in [ContactStatus::Hot, ContactStatus::Cold] {
            assert_eq!(status.toggled().toggled(), status);
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContactStatus::Hot).unwrap(),
            "\"hot\""
        );
        assert_eq!(
            serde_json::from_str::<ContactStatus>("\"cold\"").unwrap(),
            ContactStatus::Cold
        );
    }

    #[test]
    fn status_parses_from_str() {
        assert_eq!("hot".parse::<ContactStatus>().unwrap(), ContactStatus::Hot);
        assert!("warm".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn contact_serialization_omits_id() {
        let contact = Contact::new(
            "Amy",
            "Lee",
            "+15550001111",
            ContactStatus::Hot,
            Uuid::new_v4(),
        );
        let json = serde_json::to_value(&contact).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["first_name"], "Amy");
        assert_eq!(json["phoneNumber"], "+15550001111");
        assert_eq!(json["status"], "hot");
    }

    #[test]
    fn contact_touch_moves_last_updated_forward() {
        let mut contact = Contact::new("A", "B", "1", ContactStatus::Cold, Uuid::new_v4());
        contact.last_updated = 0;
        contact.touch();
        assert!(contact.last_updated > 0);
    }

    #[test]
    fn form_defaults() {
        let form = Form::new("Open House", Uuid::new_v4());
        assert_eq!(form.name, "Open House");
        assert!(form.message_template.is_empty());
        assert!(!form.enable_capturing);
        assert!(form.auto_follow_up);
        assert!(!form.post_later);
        assert_eq!(form.post_later_type, DelayUnit::Minutes);
        assert_eq!(form.post_later_value, 0);
        assert!(!form.include_attachment);
        assert_eq!(form.attachment_type, AttachmentKind::Gif);
        assert!(form.attachment_value.is_empty());
    }

    #[test]
    fn form_serializes_backend_column_names() {
        let form = Form::new("Demo", Uuid::new_v4());
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["enableCapturing"], false);
        assert_eq!(json["autoFollowUp"], true);
        assert_eq!(json["postLaterType"], "minutes");
        assert_eq!(json["attachmentType"], "gif");
        assert!(json.get("user_id").is_some());
    }

    #[test]
    fn message_row_decodes_with_attachment_defaults() {
        // Queued-message rows from the API may omit attachment columns.
        let raw = format!(
            r#"{{"id":"{}","user_id":"{}","phoneNumber":"+1555","message":"hi"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let message: Message = serde_json::from_str(&raw).unwrap();
        assert!(!message.use_attachment);
        assert!(message.attachment_type.is_empty());
    }

    #[test]
    fn fresh_messages_get_distinct_ids() {
        let user = Uuid::new_v4();
        let a = Message::new(user, "+1555".into(), "hi".into());
        let b = Message::new(user, "+1555".into(), "hi".into());
        assert_ne!(a.id, b.id);
    }
}
