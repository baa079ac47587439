//! Client-local settings — the automation credential cache and a couple of
//! screen preferences.
//!
//! These used to live in process-wide app storage read on every screen
//! appearance. Here they are one explicit object loaded from a JSON file
//! and refreshed only on defined triggers (post-sign-in, explicit refresh).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, SettingsError};
use crate::store::ApiKeyStore;

/// Persisted client-local values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Automation API key, cached from the backend.
    #[serde(default)]
    pub api_key: String,
    /// Display name for imported device-contact groups.
    #[serde(default)]
    pub group_name: String,
    /// Stored lead-photo file name (empty = bundled default).
    #[serde(default)]
    pub lead_photo: String,
}

/// File-backed settings storage.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform data directory for this app.
    pub fn default_data_dir() -> std::result::Result<PathBuf, SettingsError> {
        let dirs = directories::ProjectDirs::from("app", "outreach", "outreach")
            .ok_or(SettingsError::NoDataDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Default settings file location.
    pub fn default_path() -> std::result::Result<PathBuf, SettingsError> {
        Ok(Self::default_data_dir()?.join("settings.json"))
    }

    /// Load settings, treating a missing file as defaults.
    pub fn load(&self) -> std::result::Result<Settings, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, settings: &Settings) -> std::result::Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }

    /// Refresh the cached automation key from the backend. Called after
    /// sign-in or on an explicit user refresh — never implicitly per
    /// render. An absent key leaves the cache untouched.
    pub async fn refresh_api_key(&self, keys: &ApiKeyStore, user_id: Uuid) -> Result<Settings> {
        let mut settings = self.load()?;
        if let Some(key) = keys.get(user_id).await? {
            debug!("Refreshed cached API key");
            settings.api_key = key.key_value;
            self.save(&settings)?;
        }
        Ok(settings)
    }
}
