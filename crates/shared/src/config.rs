//! Configuration types for the controller

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::InvalidConfigError;

/// Retry policy for retryable reconcile failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Passes per trigger, including the first
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each further retry
    pub backoff_base_ms: u64,

    /// Upper bound for a single delay
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base_ms: 50,
            backoff_max_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(32);
        let millis = self
            .backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(self.backoff_max_ms);
        Duration::from_millis(millis)
    }
}

/// Controller configuration file (`ttt.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerConfig {
    /// JSON store file; games are kept in memory when unset
    pub store_path: Option<PathBuf>,

    /// Reconcile workers; distinct games run in parallel
    pub workers: usize,

    /// Seed for the computer's random source, drawn from entropy when unset
    pub seed: Option<u64>,

    /// Re-enqueue a game after its status changed
    pub requeue_on_change: bool,

    pub retry: RetryPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            workers: 4,
            seed: None,
            requeue_on_change: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.workers == 0 {
            return Err(invalid("workers", "must be at least 1"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.maxAttempts", "must be at least 1"));
        }
        if self.retry.backoff_base_ms > self.retry.backoff_max_ms {
            return Err(invalid(
                "retry.backoffBaseMs",
                "must not exceed retry.backoffMaxMs",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::ConfigError {
    InvalidConfigError {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
