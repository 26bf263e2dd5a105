//! Configuration for the sfmeta CLI
//!
//! Cache location and profile chunk size. Remote settings live in
//! [`sfmeta_sync::SyncConfig`] and are only loaded by commands that sync.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sfmeta_common::chunk::DEFAULT_CHUNK_SIZE;
use std::path::PathBuf;

// ============================================================================
// CLI Configuration Constants
// ============================================================================

/// Directory under the platform cache dir holding the cache database.
pub const CACHE_DIR_NAME: &str = "sfmeta";

/// File name of the cache database.
pub const CACHE_DB_FILE: &str = "sfmeta.db";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// SQLite cache database path
    pub cache_db: PathBuf,

    /// Items per profile permission chunk
    pub chunk_size: usize,
}

impl CliConfig {
    /// Defaults: `<cache dir>/sfmeta/sfmeta.db`, chunks of 100
    pub fn new() -> Result<Self> {
        let cache_db = dirs::cache_dir()
            .ok_or_else(|| CliError::config("Could not determine cache directory"))?
            .join(CACHE_DIR_NAME)
            .join(CACHE_DB_FILE);

        Ok(Self {
            cache_db,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new()?;

        if let Some(path) = env_non_empty("SFMETA_CACHE_DB") {
            config.cache_db = PathBuf::from(path);
        }

        if let Some(raw) = env_non_empty("SFMETA_CHUNK_SIZE") {
            config.chunk_size = raw.parse().map_err(|_| {
                CliError::config(format!("SFMETA_CHUNK_SIZE must be a number, got '{}'", raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(CliError::config("SFMETA_CHUNK_SIZE must be at least 1"));
        }
        if self.cache_db.as_os_str().is_empty() {
            return Err(CliError::config("SFMETA_CACHE_DB cannot be empty"));
        }
        Ok(())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
