//! Parse errors

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Failure to read one metadata file or directory
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Metadata file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("Unexpected root element in {path}: expected <{expected}>, found <{found}>")]
    UnexpectedRoot {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("Invalid chunk size for {path}: {message}")]
    Chunking { path: PathBuf, message: String },
}

impl ParseError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn xml(path: &Path, message: impl std::fmt::Display) -> Self {
        Self::Xml {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
