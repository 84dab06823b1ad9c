//! Error types for mail-assist.

use serde::{Deserialize, Serialize};

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail service error: {0}")]
    Mail(#[from] MailError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mail provider errors.
///
/// Serializable so a per-action failure can be carried inside an
/// execution report instead of collapsing to a bare `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MailError {
    #[error("Provider call {operation} failed: {reason}")]
    Provider { operation: String, reason: String },

    #[error("Authentication failed: {reason}")]
    Auth { reason: String },

    #[error("Message not found: {id}")]
    NotFound { id: String },

    #[error("Provider call {operation} timed out")]
    Timeout { operation: String },

    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to open database: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
