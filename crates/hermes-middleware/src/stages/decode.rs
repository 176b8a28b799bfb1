//! Generic payload decoding middleware.
//!
//! [`DecodingMiddleware`] gates on request method and content type, then
//! runs a pluggable [`BodyDecoder`] over the buffered body. Decode
//! strategies are independent values injected at construction; adding a
//! new payload format means implementing [`BodyDecoder`], not deriving a
//! new middleware.
//!
//! Per request the middleware moves through a fixed sequence:
//!
//! ```text
//! METHOD_CHECK → CONTENT_TYPE_CHECK → DECODING → FORWARD | REJECT
//! ```
//!
//! Failing either gate forwards the request untouched (an unsupported
//! method or content type is not an error). Only a decode failure
//! rejects.

use crate::context::{context_or_empty, ContextGenerator, EmptyContextGenerator};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{body_bytes, Request, RequestExt, Response, ResponseExt};
use bytes::Bytes;
use hermes_core::{DecodeError, ErrorEnvelope};
use http::StatusCode;
use std::collections::HashSet;
use std::sync::Arc;

/// Capability for decoding a raw request body into a structured value.
pub trait BodyDecoder: Send + Sync + 'static {
    /// A short name for logging.
    fn name(&self) -> &'static str;

    /// Decodes the body bytes.
    fn decode(&self, body: &Bytes) -> Result<serde_json::Value, DecodeError>;

    /// Content types this decoder understands. A request is decoded when
    /// its `Content-Type` value contains one of these as a substring, so
    /// parameterized values such as `application/json; charset=utf-8`
    /// match.
    fn supported_content_types(&self) -> &'static [&'static str];
}

/// Decoder for `application/json` bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyDecoder;

impl BodyDecoder for JsonBodyDecoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, body: &Bytes) -> Result<serde_json::Value, DecodeError> {
        serde_json::from_slice(body).map_err(DecodeError::from)
    }

    fn supported_content_types(&self) -> &'static [&'static str] {
        &["application/json"]
    }
}

/// Middleware that decodes request payloads and attaches the result as
/// the request's parsed body.
///
/// # Example
///
/// ```ignore
/// use hermes_middleware::stages::{DecodingMiddleware, JsonBodyDecoder};
///
/// let middleware = DecodingMiddleware::new(JsonBodyDecoder, ["POST"]);
/// ```
pub struct DecodingMiddleware<D> {
    decoder: D,
    /// Allowed methods, lowercased at construction.
    allowed_methods: HashSet<String>,
    context_generator: Arc<dyn ContextGenerator>,
    reject_status: StatusCode,
}

impl<D: BodyDecoder> DecodingMiddleware<D> {
    /// Creates a decoding middleware for the given decoder and allowed
    /// methods (matched case-insensitively).
    #[must_use]
    pub fn new<I, M>(decoder: D, allowed_methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: AsRef<str>,
    {
        Self {
            decoder,
            allowed_methods: allowed_methods
                .into_iter()
                .map(|method| method.as_ref().to_ascii_lowercase())
                .collect(),
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

    fn content_type_supported(&self, actual: &str) -> bool {
        self.decoder
            .supported_content_types()
            .iter()
            .any(|supported| actual.contains(supported))
    }
}

impl<D: BodyDecoder> Middleware for DecodingMiddleware<D> {
    fn name(&self) -> &'static str {
        "decoding"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let context = context_or_empty(self.context_generator.as_ref(), &request).await;

            let method = request.method().as_str().to_ascii_lowercase();
            if !self.allowed_methods.contains(&method) {
                tracing::info!(
                    context = %context,
                    method = %request.method(),
                    "Unsupported method supplied, skipping decoding"
                );
                return next.run(request).await;
            }

            if !self.content_type_supported(request.content_type()) {
                tracing::info!(
                    context = %context,
                    content_type = request.content_type(),
                    decoder = self.decoder.name(),
                    "Content type is not supported by the decoder, skipping decoding"
                );
                return next.run(request).await;
            }

            let bytes = body_bytes(&request).await;
            match self.decoder.decode(&bytes) {
                Ok(value) => {
                    tracing::info!(
                        context = %context,
                        decoder = self.decoder.name(),
                        "Successfully parsed payload"
                    );
                    next.run(request.with_parsed_body(value)).await
                }
                Err(err) => {
                    let message = format!("Error while decoding payload. Cause: [{err}]");
                    tracing::error!(context = %context, "{}", message);
                    Response::envelope(
                        self.reject_status,
                        &ErrorEnvelope::unprocessable_entity(message),
                    )
                }
            }
        })
    }
}
