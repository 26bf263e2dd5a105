//! Timeout and retry combinators for remote calls

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempts, linear backoff unit and per-attempt ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base: config.retry_base(),
            timeout: config.request_timeout(),
        }
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt)
    }
}

/// Fail with [`SyncError::Timeout`] if `fut` does not finish within `limit`
pub async fn with_timeout<F, T>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(SyncError::Timeout(limit)),
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or
/// `max_attempts` is reached. Each attempt is bounded by the policy timeout.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match with_timeout(policy.timeout, op()).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = %label, attempt, "Succeeded after retry");
                }
                return Ok(value);
            },
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = policy.backoff(attempt);
                warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {:?}...",
                    label, attempt, max_attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            },
            Err(e) => {
                warn!("{} failed after {} attempt(s): {}", label, attempt, e);
                return Err(e);
            },
        }
    }
}
