//! Error types for the sfmeta CLI
//!
//! Messages are user-facing and say what to check next.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Metadata could not be parsed
    #[error("Parse error: {0}. Check that the path points at Salesforce source-format metadata.")]
    Parse(#[from] sfmeta_ingest::ParseError),

    /// Sync engine failure outside per-row reporting
    #[error("Sync error: {0}. Check NOTION_TOKEN and the parent page or database id.")]
    Sync(#[from] sfmeta_sync::SyncError),

    /// Entity missing from the local cache
    #[error("'{kind}/{api_name}' is not in the cache. Run 'sfmeta cache {kind} <path>' first.")]
    NotCached { kind: String, api_name: String },

    /// Cache operation failed
    #[error("Cache error: {0}. Delete the cache database (see SFMETA_CACHE_DB) to rebuild it.")]
    Cache(String),

    /// Database operation failed (SQLx)
    #[error("Database error: {0}. Check that the cache database is writable.")]
    Database(#[from] sqlx::Error),

    /// Every entity of a batch failed
    #[error("All {0} entities failed to sync. Run with --verbose for details.")]
    BatchFailed(usize),

    /// Calling convention violated
    #[error("Invalid arguments: {0}. Run with --help for usage.")]
    Usage(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// JSON encoding or decoding failed
    #[error("Failed to process JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    pub fn not_cached(kind: impl Into<String>, api_name: impl Into<String>) -> Self {
        Self::NotCached {
            kind: kind.into(),
            api_name: api_name.into(),
        }
    }
}

impl From<sfmeta_common::SfmetaError> for CliError {
    fn from(err: sfmeta_common::SfmetaError) -> Self {
        match err {
            sfmeta_common::SfmetaError::Io(e) => Self::Io(e),
            sfmeta_common::SfmetaError::Serialization(e) => Self::JsonParse(e),
            other => Self::Config(other.to_string()),
        }
    }
}
