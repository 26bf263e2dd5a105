//! Error types shared across sfmeta crates

use thiserror::Error;

/// Result type alias for sfmeta operations
pub type Result<T> = std::result::Result<T, SfmetaError>;

/// Main error type for sfmeta
#[derive(Error, Debug)]
pub enum SfmetaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("Unknown permission kind: {0}")]
    UnknownPermissionKind(String),

    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}
