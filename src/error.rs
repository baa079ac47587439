//! Error types for Outreach.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the hosted table/auth API.
///
/// Write rejections are surfaced to the interactive caller; the automation
/// entry points absorb every failure into a neutral result instead.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend rejected {op} on {table}: status {status}: {body}")]
    Rejected {
        op: String,
        table: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {table} rows: {message}")]
    Decode { table: String, message: String },

    #[error("Backend returned no rows for {op} on {table}")]
    MissingRow { op: String, table: String },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not signed in")]
    NotAuthenticated,
}

/// Client-local settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No platform data directory available")]
    NoDataDir,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
