//! Sync configuration
//!
//! Remote endpoint, credentials, parent location and the knobs of the
//! reconciliation engine, loaded from the environment.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Sync Configuration Constants
// ============================================================================

/// Default remote endpoint base.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// API version sent in the `Notion-Version` header.
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

/// Rows dispatched concurrently per window.
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Attempts per remote write before the row is recorded as failed.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Linear backoff unit; attempt `n` waits `n` times this before retrying.
pub const DEFAULT_RETRY_BASE_MS: u64 = 1000;

/// Ceiling for a single remote attempt.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Title of the workspace page created when no parent is configured or found.
pub const DEFAULT_ROOT_TITLE: &str = "Salesforce Metadata Documentation";

/// Where documentation pages are created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ParentSetting {
    /// Pages become rows of this database
    Database(String),
    /// Pages become children of this page
    Page(String),
    /// Search the workspace, else create a root page
    Discover,
}

/// Sync engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub api_version: String,
    pub parent: ParentSetting,
    pub root_title: String,
    pub concurrency: usize,
    pub max_attempts: u32,
    pub retry_base_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            parent: ParentSetting::Discover,
            root_title: DEFAULT_ROOT_TITLE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_ms: DEFAULT_RETRY_BASE_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable numbers are a configuration error rather than a silent
    /// fallback to the default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = env_non_empty("NOTION_API_URL").or_else(|| env_non_empty("MCP_API_URL")) {
            config.api_url = url;
        }
        config.token = env_non_empty("NOTION_TOKEN");
        if let Some(version) = env_non_empty("NOTION_VERSION") {
            config.api_version = version;
        }

        config.parent = match (env_non_empty("NOTION_DATABASE_ID"), env_non_empty("NOTION_ROOT_PAGE_ID")) {
            (Some(db), _) => ParentSetting::Database(db),
            (None, Some(page)) => ParentSetting::Page(page),
            (None, None) => ParentSetting::Discover,
        };

        if let Some(title) = env_non_empty("SFMETA_ROOT_TITLE") {
            config.root_title = title;
        }

        if let Some(v) = env_parse("SFMETA_CONCURRENCY")? {
            config.concurrency = v;
        }
        if let Some(v) = env_parse("SFMETA_MAX_ATTEMPTS")? {
            config.max_attempts = v;
        }
        if let Some(v) = env_parse("SFMETA_RETRY_BASE_MS")? {
            config.retry_base_ms = v;
        }
        if let Some(v) = env_parse("SFMETA_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = v;
        }

        config.validate().map_err(SyncError::Config)?;
        Ok(config)
    }

    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("API URL cannot be empty".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!("API URL must be http(s): {}", self.api_url));
        }
        if self.concurrency == 0 {
            return Err("Concurrency must be at least 1".to_string());
        }
        if self.max_attempts == 0 {
            return Err("Max attempts must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base(&self) -> Duration {
        Duration::from_millis(self.retry_base_ms)
    }
}

/// Builder for [`SyncConfig`]
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    pub fn parent(mut self, parent: ParentSetting) -> Self {
        self.config.parent = parent;
        self
    }

    pub fn root_title(mut self, title: impl Into<String>) -> Self {
        self.config.root_title = title.into();
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn retry_base_ms(mut self, ms: u64) -> Self {
        self.config.retry_base_ms = ms;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn build(self) -> Result<SyncConfig> {
        self.config.validate().map_err(SyncError::Config)?;
        Ok(self.config)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env_non_empty(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SyncError::config(format!("{} must be a number, got '{}'", key, raw))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 10] = [
        "NOTION_API_URL",
        "MCP_API_URL",
        "NOTION_TOKEN",
        "NOTION_VERSION",
        "NOTION_DATABASE_ID",
        "NOTION_ROOT_PAGE_ID",
        "SFMETA_CONCURRENCY",
        "SFMETA_MAX_ATTEMPTS",
        "SFMETA_RETRY_BASE_MS",
        "SFMETA_REQUEST_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.parent, ParentSetting::Discover);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        std::env::set_var("MCP_API_URL", "http://localhost:3000");
        std::env::set_var("NOTION_ROOT_PAGE_ID", "page-1");
        std::env::set_var("SFMETA_CONCURRENCY", "5");

        let config = SyncConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.parent, ParentSetting::Page("page-1".to_string()));
        assert_eq!(config.concurrency, 5);

        std::env::set_var("NOTION_API_URL", "https://proxy.example.com/v1");
        std::env::set_var("NOTION_DATABASE_ID", "db-1");
        let config = SyncConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://proxy.example.com/v1");
        assert_eq!(config.parent, ParentSetting::Database("db-1".to_string()));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_numbers() {
        clear_env();
        std::env::set_var("SFMETA_MAX_ATTEMPTS", "three");
        assert!(matches!(SyncConfig::from_env(), Err(SyncError::Config(_))));

        std::env::set_var("SFMETA_MAX_ATTEMPTS", "0");
        assert!(matches!(SyncConfig::from_env(), Err(SyncError::Config(_))));
        clear_env();
    }

    #[test]
    fn test_builder_validation() {
        assert!(SyncConfig::builder().concurrency(0).build().is_err());
        assert!(SyncConfig::builder().api_url("").build().is_err());
        assert!(SyncConfig::builder().api_url("ftp://x").build().is_err());

        let config = SyncConfig::builder()
            .api_url("http://127.0.0.1:9999")
            .token("secret")
            .retry_base_ms(10)
            .build()
            .unwrap();
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.retry_base(), Duration::from_millis(10));
    }
}
