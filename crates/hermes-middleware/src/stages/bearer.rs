//! Bearer token verification against an external verifier.

use crate::context::{context_or_empty, ContextGenerator, EmptyContextGenerator};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, RequestExt, Response, ResponseExt};
use hermes_core::{ErrorEnvelope, VerifyError};
use http::StatusCode;
use std::sync::Arc;

/// Capability for verifying an identity token against an external
/// service.
pub trait TokenVerifier: Send + Sync + 'static {
    /// Verifies the token, returning whether it is valid.
    fn verify<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<bool, VerifyError>>;
}

/// Middleware that validates a `Bearer <token>` header via a
/// [`TokenVerifier`].
///
/// The header must hold exactly two space-separated parts; the second is
/// handed to the verifier. A verifier error is logged and treated the
/// same as a failed verification. Rejections carry the
/// `{"status": "Unauthorized", "message": "Incorrect ID token"}` envelope
/// at the configured status - HTTP 200 by default, following the
/// messaging convention where the broker must not retry an
/// unauthenticated delivery.
pub struct BearerTokenVerificationMiddleware<V> {
    verifier: V,
    header_name: String,
    context_generator: Arc<dyn ContextGenerator>,
    reject_status: StatusCode,
}

impl<V: TokenVerifier> BearerTokenVerificationMiddleware<V> {
    /// Creates the middleware reading tokens from the given header.
    #[must_use]
    pub fn new(verifier: V, header_name: impl Into<String>) -> Self {
        Self {
            verifier,
            header_name: header_name.into(),
            context_generator: Arc::new(EmptyContextGenerator),
            reject_status: StatusCode::OK,
        }
    }

    /// Sets the context generator used for log correlation.
    #[must_use]
    pub fn with_context_generator(mut self, generator: impl ContextGenerator) -> Self {
        self.context_generator = Arc::new(generator);
        self
    }

    /// Sets the HTTP status used on rejection responses.
    #[must_use]
    pub fn with_reject_status(mut self, status: StatusCode) -> Self {
        self.reject_status = status;
        self
    }

    fn reject(&self) -> Response {
        Response::envelope(
            self.reject_status,
            &ErrorEnvelope::unauthorized("Incorrect ID token"),
        )
    }
}

impl<V: TokenVerifier> Middleware for BearerTokenVerificationMiddleware<V> {
    fn name(&self) -> &'static str {
        "bearer_token_verification"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let context = context_or_empty(self.context_generator.as_ref(), &request).await;

            let joined = request.header_values(&self.header_name).join(" ");
            let parts: Vec<&str> = joined.split(' ').collect();
            if parts.len() != 2 {
                tracing::error!(
                    context = %context,
                    "Bearer token has invalid format - it should contain two strings separated by a blank space"
                );
                return self.reject();
            }

            match self.verifier.verify(parts[1]).await {
                Ok(valid) => {
                    tracing::info!(
                        context = %context,
                        output = valid,
                        "Verification of token done"
                    );
                    if valid {
                        next.run(request).await
                    } else {
                        self.reject()
                    }
                }
                Err(err) => {
                    tracing::error!(
                        context = %context,
                        error = %err,
                        "An error occurred during verification of the token"
                    );
                    self.reject()
                }
            }
        })
    }
}
