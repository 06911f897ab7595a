//! Error types for configuration loading

use thiserror::Error;

/// Error thrown when a configuration value is out of range
#[derive(Debug, Error)]
#[error("Invalid configuration '{field}': {reason}")]
pub struct InvalidConfigError {
    pub field: String,
    pub reason: String,
}

/// General configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] InvalidConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
