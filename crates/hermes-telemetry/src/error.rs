//! Telemetry error types.

use thiserror::Error;

/// Errors raised while initializing telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Logging subsystem initialization failed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
