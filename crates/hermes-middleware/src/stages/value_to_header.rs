//! Promotion of payload values into an outgoing request header.

use crate::context::{context_or_empty, ContextGenerator, EmptyContextGenerator};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{value_to_string, Request, RequestExt, Response, ResponseExt};
use hermes_core::{extract, ConfigError, ErrorEnvelope, KeySeparator, PathSpec};
use http::{HeaderName, HeaderValue, StatusCode};
use indexmap::IndexMap;
use std::sync::Arc;

/// Middleware that extracts several named payload values and attaches
/// them as `key=value` lines under one configured header on the
/// forwarded request.
///
/// Each configured entry maps an output key to a dot-path into the
/// parsed payload. All paths must resolve; a single missing key aborts
/// the request with an error naming that key and its traversed prefix.
/// The promoted lines parse back into the same entries through
/// [`HeaderContextGenerator`](crate::context::HeaderContextGenerator),
/// which is how downstream services recover the context.
pub struct PayloadValueToHeaderMiddleware {
    header_name: HeaderName,
    mapping: IndexMap<String, PathSpec>,
    context_generator: Arc<dyn ContextGenerator>,
    separator: KeySeparator,
    reject_status: StatusCode,
}

impl std::fmt::Debug for PayloadValueToHeaderMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadValueToHeaderMiddleware")
            .field("header_name", &self.header_name)
            .field("mapping", &self.mapping)
            .field("separator", &self.separator)
            .field("reject_status", &self.reject_status)
            .finish_non_exhaustive()
    }
}

impl PayloadValueToHeaderMiddleware {
    /// Creates the middleware for the given target header and
    /// output-key to path mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderName`] when `header_name` is
    /// not a valid HTTP header name.
    pub fn new(
        header_name: &str,
        mapping: IndexMap<String, PathSpec>,
    ) -> Result<Self, ConfigError> {
        let header_name =
            HeaderName::try_from(header_name).map_err(|_| ConfigError::InvalidHeaderName {
                name: header_name.to_string(),
            })?;

        Ok(Self {
            header_name,
            mapping,
            context_generator: Arc::new(EmptyContextGenerator),
            separator: KeySeparator::Dot,
            reject_status: StatusCode::OK,
        })
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

    fn header_lines(&self, payload: &serde_json::Value) -> Result<Vec<HeaderValue>, String> {
        let mut lines = Vec::with_capacity(self.mapping.len());
        for (output_key, path) in &self.mapping {
            let value = extract(payload, path).map_err(|missing| {
                format!(
                    "Unprocessable entity. Cause: [Missing key: [{}] in path: [{}]]",
                    missing.key,
                    missing.traversed_path(self.separator)
                )
            })?;

            let line = format!("{output_key}={}", value_to_string(value));
            let line = HeaderValue::try_from(line).map_err(|_| {
                format!(
                    "Unprocessable entity. Cause: [Value under key: [{output_key}] cannot be used as a header value]"
                )
            })?;
            lines.push(line);
        }

        Ok(lines)
    }
}

impl Middleware for PayloadValueToHeaderMiddleware {
    fn name(&self) -> &'static str {
        "payload_value_to_header"
    }

    fn process<'a>(&'a self, mut request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let context = context_or_empty(self.context_generator.as_ref(), &request).await;

            let verdict = match request.parsed_body() {
                Some(payload) if payload.is_object() => self.header_lines(payload),
                _ => Err("Payload is not a map".to_string()),
            };

            match verdict {
                Ok(lines) => {
                    for line in lines {
                        request.headers_mut().append(self.header_name.clone(), line);
                    }
                    next.run(request).await
                }
                Err(message) => {
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

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn mapping() -> IndexMap<String, PathSpec> {
        IndexMap::from([
            (
                "eventType".to_string(),
                PathSpec::parse("message.attributes.eventType"),
            ),
            (
                "target".to_string(),
                PathSpec::parse("message.attributes.target"),
            ),
        ])
    }

    fn request_with_payload(payload: Option<serde_json::Value>) -> Request {
        let request: Request = http::Request::builder()
            .method("POST")
            .uri("/push")
            .body(Full::new(Bytes::new()))
            .unwrap();
        match payload {
            Some(value) => request.with_parsed_body(value),
            None => request,
        }
    }

    fn capturing_handler(
        calls: Arc<AtomicUsize>,
        seen: Arc<Mutex<Vec<String>>>,
        header_name: &'static str,
    ) -> Next<'static> {
        Next::handler(move |req: Request| {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                *seen.lock().unwrap() = req
                    .header_values(header_name)
                    .into_iter()
                    .map(ToString::to_string)
                    .collect();
                http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        })
    }

    async fn envelope_of(response: Response) -> hermes_core::ErrorEnvelope {
        let body = response
            .into_body()
            .collect()
            .await
            .map(http_body_util::Collected::to_bytes)
            .unwrap_or_default();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_invalid_header_name_is_a_configuration_error() {
        let err = PayloadValueToHeaderMiddleware::new("not a header\n", mapping()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeaderName { .. }));
    }

    #[tokio::test]
    async fn test_promotes_values_as_key_value_lines() {
        let mw = PayloadValueToHeaderMiddleware::new("x-message-context", mapping()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let request = request_with_payload(Some(json!({
            "message": {"attributes": {"eventType": "user.registered", "target": "billing"}}
        })));

        let response = mw
            .process(
                request,
                capturing_handler(calls.clone(), seen.clone(), "x-message-context"),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "eventType=user.registered".to_string(),
                "target=billing".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_payload_rejects_as_unprocessable() {
        let mw = PayloadValueToHeaderMiddleware::new("x-message-context", mapping()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let response = mw
            .process(
                request_with_payload(None),
                capturing_handler(calls.clone(), seen, "x-message-context"),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let envelope = envelope_of(response).await;
        assert_eq!(envelope.status, "Unprocessable entity");
        assert_eq!(envelope.message, "Payload is not a map");
    }

    #[tokio::test]
    async fn test_missing_key_aborts_with_specific_key_and_prefix() {
        let mw = PayloadValueToHeaderMiddleware::new("x-message-context", mapping()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let request = request_with_payload(Some(json!({
            "message": {"attributes": {"eventType": "user.registered"}}
        })));

        let response = mw
            .process(
                request,
                capturing_handler(calls.clone(), seen, "x-message-context"),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let envelope = envelope_of(response).await;
        assert_eq!(
            envelope.message,
            "Unprocessable entity. Cause: [Missing key: [target] in path: [message.attributes]]"
        );
    }

    #[test]
    fn test_middleware_name() {
        let mw = PayloadValueToHeaderMiddleware::new("x-ctx", mapping()).unwrap();
        assert_eq!(mw.name(), "payload_value_to_header");
    }
}
