//! Error types for the sync engine

use std::time::Duration;
use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    /// No template registered under this kind and name
    #[error("Template not found: {kind}/{name}")]
    TemplateNotFound { kind: String, name: String },

    /// Template descriptor rejected at registration
    #[error("Invalid template {name}: {reason}")]
    InvalidTemplate { name: String, reason: String },

    /// Render context is missing required keys
    #[error("Template {template} is missing required context: {}", missing.join(", "))]
    Validation {
        template: String,
        missing: Vec<String>,
    },

    /// Remote API answered with a non-success status
    #[error("Remote request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// A single attempt exceeded its time budget
    #[error("Remote request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn template_not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::TemplateNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether another attempt of the same remote call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Remote { .. }
                | SyncError::MalformedResponse(_)
                | SyncError::Timeout(_)
                | SyncError::Http(_)
        )
    }
}
