//! Core error types for `QuotaBar`.

use thiserror::Error;

/// Core error type for `QuotaBar` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown provider identifier.
    #[error("Unknown provider: {0}")]
    ProviderNotFound(String),

    /// Unknown display mode.
    #[error("Unknown display mode: {0}")]
    InvalidDisplayMode(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
