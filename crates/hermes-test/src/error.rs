//! Test error types.

use thiserror::Error;

/// Errors raised by test helpers.
#[derive(Debug, Error)]
pub enum TestError {
    /// Building a test request failed.
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// Reading a response body failed.
    #[error("failed to read body: {0}")]
    BodyRead(String),

    /// Deserializing a JSON body failed.
    #[error("failed to parse JSON body: {0}")]
    Json(#[from] serde_json::Error),
}
