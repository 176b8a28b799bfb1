//! Typed error kinds shared across the middleware crates.
//!
//! Every fallible operation in the library returns one of these types
//! explicitly; callers pattern-match on the kind instead of relying on a
//! catch-all error hierarchy. [`MissingKey`](crate::MissingKey) lives in
//! the path module next to the extractor that produces it.

use thiserror::Error;

/// Construction-time configuration error.
///
/// Raised when a middleware is built with an invalid configuration.
/// These are fatal: the middleware value is never constructed and no
/// request is ever processed with it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A path specification that must name at least one key was empty.
    #[error("path to the payload value must not be empty")]
    EmptyPathSpec,

    /// A configured header name is not a valid HTTP header name.
    #[error("[{name}] is not a valid header name")]
    InvalidHeaderName {
        /// The offending name.
        name: String,
    },
}

/// Failure to decode a raw request body into a structured value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Creates a decode error from an underlying cause description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the cause description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Failure to derive a request context.
///
/// Middleware that use the context only for logging catch this error and
/// degrade to an empty context; middleware whose purpose is the context
/// itself surface it as the primary failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The request body could not be parsed.
    #[error("error while decoding the context payload: {0}")]
    Decode(#[from] DecodeError),

    /// A required key is absent from the message payload; `path` is the
    /// full dot-path of the missing key.
    #[error("missing key [{path}] in the message payload")]
    MissingKey {
        /// Dot-path of the absent key.
        path: String,
    },

    /// One or more required attribute keys are absent.
    #[error("missing attribute keys [{}] in the [message.attributes] payload", .keys.join(", "))]
    MissingAttributes {
        /// The absent attribute keys, in their required order.
        keys: Vec<String>,
    },

    /// The configured path structure is not present in the payload.
    ///
    /// Deliberately coarser than [`MissingKey`](crate::MissingKey): it
    /// names the full configured path list rather than the specific key
    /// that failed.
    #[error("required payload structure [{}] was not present in the payload", .paths.join(", "))]
    StructureNotFound {
        /// All configured dot-paths.
        paths: Vec<String>,
    },
}

/// Failure raised by an external token verifier.
///
/// Carries the underlying transport or service error as a chained
/// source. Middleware log this and treat it as a failed verification.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct VerifyError {
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

impl VerifyError {
    /// Creates a verification error from a description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a verification error with an underlying source error.
    pub fn with_source(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::EmptyPathSpec;
        assert_eq!(err.to_string(), "path to the payload value must not be empty");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{:").unwrap_err();
        let err = DecodeError::from(serde_err);
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_context_error_missing_key() {
        let err = ContextError::MissingKey {
            path: "message.attributes".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing key [message.attributes] in the message payload"
        );
    }

    #[test]
    fn test_context_error_missing_attributes() {
        let err = ContextError::MissingAttributes {
            keys: vec!["eventType".to_string(), "target".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing attribute keys [eventType, target] in the [message.attributes] payload"
        );
    }

    #[test]
    fn test_context_error_structure_not_found() {
        let err = ContextError::StructureNotFound {
            paths: vec!["message.attributes.eventType".to_string()],
        };
        assert!(err.to_string().contains("message.attributes.eventType"));
    }

    #[test]
    fn test_verify_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timeout");
        let err = VerifyError::with_source("tokeninfo endpoint unreachable", io_err);

        assert_eq!(err.message(), "tokeninfo endpoint unreachable");
        assert!(std::error::Error::source(&err).is_some());
    }
}
