//! # Hermes Core
//!
//! Core types for the Hermes messaging middleware library.
//!
//! This crate provides the foundational pieces shared by every middleware:
//!
//! - [`PathSpec`] / [`extract`] - safe traversal of nested JSON payloads
//! - [`Context`] - ordered key/value map attached to log lines
//! - [`ErrorEnvelope`] - the uniform JSON body returned on rejection
//! - Typed error kinds ([`ConfigError`], [`DecodeError`], [`ContextError`],
//!   [`VerifyError`])

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod envelope;
mod error;
mod path;

pub use context::Context;
pub use envelope::ErrorEnvelope;
pub use error::{ConfigError, ContextError, DecodeError, VerifyError};
pub use path::{extract, KeySeparator, MissingKey, PathSpec};
