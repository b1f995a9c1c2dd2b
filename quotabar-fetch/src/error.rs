//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
///
/// Any of these aborts the whole cycle; per-provider error markers are not
/// errors at this level.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetcher process could not be run to completion.
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// The output was JSON but not the expected top-level shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The output was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns true if the fetcher ran but produced unusable output.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::InvalidResponse(_) | Self::Json(_))
    }
}

// ============================================================================
// Process Error
// ============================================================================

/// Error type for process operations.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command not found.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// Command timed out.
    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    /// Non-zero exit code.
    #[error("Command exited with code {code}: {stderr}")]
    NonZeroExit {
        /// Exit code from the process.
        code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
