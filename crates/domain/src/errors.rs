//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_ERROR_BODY_CHARS;

/// Main error type for OrderSync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OrderSyncError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Credential lookup failed; aborts the whole pass.
    #[error("Credential registry error: {0}")]
    Registry(String),

    /// Persisted scheduler state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for OrderSync operations
pub type Result<T> = std::result::Result<T, OrderSyncError>;

/// Failure raised at the channel adapter boundary.
///
/// Business-level failures (`success: false` in a well-formed response) are
/// not errors here; they arrive as a normal response and are classified by
/// the orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Non-2xx status. `body` holds at most [`MAX_ERROR_BODY_CHARS`]
    /// characters of the response body.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Timeout, DNS failure, connection reset and friends.
    #[error("{0}")]
    Transport(String),

    /// 2xx response whose body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl AdapterError {
    /// Build an HTTP error, keeping only the diagnostic prefix of the body.
    pub fn http(status: u16, body: &str) -> Self {
        Self::Http { status, body: truncate_chars(body, MAX_ERROR_BODY_CHARS) }
    }
}

/// Truncate on a character boundary.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
