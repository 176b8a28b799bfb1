//! The uniform JSON body returned on rejection.

use serde::{Deserialize, Serialize};

/// Status string used for malformed or missing payload data.
pub const STATUS_BAD_REQUEST: &str = "Bad request";

/// Status string used for payloads that decode but cannot be processed.
pub const STATUS_UNPROCESSABLE_ENTITY: &str = "Unprocessable entity";

/// Status string used for failed token checks.
pub const STATUS_UNAUTHORIZED: &str = "Unauthorized";

/// The canonical JSON body for all failure responses produced by the
/// library.
///
/// Every middleware that rejects a request serializes one of these into
/// the response body, regardless of the HTTP status the response itself
/// carries. Push-delivery brokers commonly retry on non-2xx responses, so
/// the transport status and the envelope status are configured
/// independently.
///
/// # Example
///
/// ```
/// use hermes_core::ErrorEnvelope;
///
/// let envelope = ErrorEnvelope::bad_request("No payload supplied");
/// let body = serde_json::to_string(&envelope).unwrap();
/// assert_eq!(body, r#"{"status":"Bad request","message":"No payload supplied"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Coarse failure classification, e.g. `"Bad request"`.
    pub status: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ErrorEnvelope {
    /// Creates an envelope with an explicit status string.
    #[must_use]
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }

    /// Creates a `"Bad request"` envelope.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(STATUS_BAD_REQUEST, message)
    }

    /// Creates an `"Unprocessable entity"` envelope.
    #[must_use]
    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::new(STATUS_UNPROCESSABLE_ENTITY, message)
    }

    /// Creates an `"Unauthorized"` envelope.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(STATUS_UNAUTHORIZED, message)
    }
}
