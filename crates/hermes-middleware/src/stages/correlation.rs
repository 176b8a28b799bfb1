//! Correlation ID override from the message payload.

use crate::context::{context_or_empty, ContextGenerator, EmptyContextGenerator};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, RequestExt, Response, ResponseExt};
use hermes_core::{extract, ErrorEnvelope, KeySeparator, PathSpec};
use http::StatusCode;
use std::sync::Arc;

/// Capability for overriding the ambient correlation ID for the current
/// request.
pub trait CorrelationIdResolver: Send + Sync + 'static {
    /// Stores `value` as the active correlation ID.
    fn store(&self, value: &str);
}

/// Middleware that extracts a correlation ID from the parsed payload and
/// hands it to a [`CorrelationIdResolver`].
///
/// The extracted value must be a string. On success the original request
/// is forwarded unchanged.
pub struct CorrelationIdOverrideMiddleware<R> {
    resolver: R,
    path: PathSpec,
    context_generator: Arc<dyn ContextGenerator>,
    separator: KeySeparator,
    reject_status: StatusCode,
}

impl<R: CorrelationIdResolver> CorrelationIdOverrideMiddleware<R> {
    /// Creates the middleware for the given resolver and payload path.
    #[must_use]
    pub fn new(resolver: R, path: PathSpec) -> Self {
        Self {
            resolver,
            path,
            context_generator: Arc::new(EmptyContextGenerator),
            separator: KeySeparator::Dot,
            reject_status: StatusCode::OK,
        }
    }

    /// Sets the context generator used for log correlation.
    #[must_use]
    pub fn with_context_generator(mut self, generator: impl ContextGenerator) -> Self {
        self.context_generator = Arc::new(generator);
        self
    }

    /// Sets the separator used when formatting the traversed key prefix
    /// in error messages.
    #[must_use]
    pub fn with_separator(mut self, separator: KeySeparator) -> Self {
        self.separator = separator;
        self
    }

    /// Sets the HTTP status used on rejection responses.
    #[must_use]
    pub fn with_reject_status(mut self, status: StatusCode) -> Self {
        self.reject_status = status;
        self
    }
}

impl<R: CorrelationIdResolver> Middleware for CorrelationIdOverrideMiddleware<R> {
    fn name(&self) -> &'static str {
        "correlation_id_override"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let context = context_or_empty(self.context_generator.as_ref(), &request).await;

            let verdict = match request.parsed_body() {
                Some(payload) if payload.is_object() => match extract(payload, &self.path) {
                    Ok(value) => match value.as_str() {
                        Some(text) => Ok(text.to_string()),
                        None => Err("Extracted value should be of the string type".to_string()),
                    },
                    Err(missing) => Err(format!(
                        "Missing key: [{}] in the correlationId path: [{}]",
                        missing.key,
                        missing.traversed_path(self.separator)
                    )),
                },
                _ => Err("Bad payload supplied".to_string()),
            };

            match verdict {
                Ok(correlation_id) => {
                    self.resolver.store(&correlation_id);
                    tracing::info!(
                        context = %context,
                        correlation_id = %correlation_id,
                        "Storing correlation ID"
                    );
                    next.run(request).await
                }
                Err(message) => {
                    tracing::error!(context = %context, "{}", message);
                    Response::envelope(self.reject_status, &ErrorEnvelope::bad_request(message))
                }
            }
        })
    }
}
