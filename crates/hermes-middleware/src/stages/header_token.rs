//! Static header token validation.

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, RequestExt, Response, ResponseExt};
use hermes_core::ErrorEnvelope;
use http::StatusCode;

/// Middleware that compares a configured header against a static token.
///
/// The first value of the configured header must equal the configured
/// token exactly; a mismatch or an absent header rejects with HTTP 401.
/// Intended for shared-secret push endpoints where the broker is
/// configured with a fixed token.
#[derive(Debug, Clone)]
pub struct HeaderTokenValidationMiddleware {
    header_name: String,
    token: String,
    reject_status: StatusCode,
}

impl HeaderTokenValidationMiddleware {
    /// Creates the middleware for the given header name and expected
    /// token value.
    #[must_use]
    pub fn new(header_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            token: token.into(),
            reject_status: StatusCode::UNAUTHORIZED,
        }
    }

    /// Sets the HTTP status used on rejection responses.
    #[must_use]
    pub fn with_reject_status(mut self, status: StatusCode) -> Self {
        self.reject_status = status;
        self
    }
}

impl Middleware for HeaderTokenValidationMiddleware {
    fn name(&self) -> &'static str {
        "header_token_validation"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let supplied = request.header_values(&self.header_name);
            if supplied.first().copied() != Some(self.token.as_str()) {
                tracing::error!(header = %self.header_name, "Invalid or missing header token");
                return Response::envelope(
                    self.reject_status,
                    &ErrorEnvelope::unauthorized("Unauthorized"),
                );
            }

            next.run(request).await
        })
    }
}
