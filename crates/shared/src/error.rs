//! Error types for the cognitive games workspace

use thiserror::Error;

/// Error raised when a configuration value is outside its allowed range
#[derive(Debug, Error)]
#[error("Invalid configuration value for '{field}': {reason}")]
pub struct InvalidConfigError {
    pub field: String,
    pub reason: String,
}

/// Error raised when a persisted value cannot be decoded
#[derive(Debug, Error)]
#[error("Malformed persisted value under '{key}': {reason}")]
pub struct MalformedStateError {
    pub key: String,
    pub reason: String,
}

/// General error type
#[derive(Debug, Error)]
pub enum CogniError {
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    #[error(transparent)]
    MalformedState(#[from] MalformedStateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CogniError>;
