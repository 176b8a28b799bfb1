//! # Hermes Telemetry
//!
//! Structured logging setup for services using Hermes middleware.
//!
//! Middleware emit `tracing` events with the generated request context
//! attached; this crate configures the subscriber side so those events
//! come out as JSON (or pretty text in development) with consistent
//! field names.

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type alias using [`TelemetryError`].
pub type TelemetryResult<T> = Result<T, TelemetryError>;
