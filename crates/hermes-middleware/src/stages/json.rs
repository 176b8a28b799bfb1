//! Standalone JSON decoding middleware.
//!
//! A lighter sibling of the generic
//! [`DecodingMiddleware`](crate::stages::DecodingMiddleware): no method
//! gating, no context generation, and JSON syntax failures reject with
//! HTTP 400 instead of the messaging convention of HTTP 200. Both
//! variants are kept deliberately; which one a service mounts is a
//! deployment choice.

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{body_bytes, Request, RequestExt, Response, ResponseExt};
use hermes_core::ErrorEnvelope;
use http::StatusCode;

const SUPPORTED_CONTENT_TYPE: &str = "application/json";

/// Middleware that parses JSON request bodies into the parsed-body slot.
///
/// Requests with an empty body or a non-JSON content type are forwarded
/// untouched. A body that fails to parse rejects with
/// `{"status": "Bad request", "message": "Invalid JSON payload"}`.
#[derive(Debug, Clone)]
pub struct JsonDecodingMiddleware {
    reject_status: StatusCode,
}

impl JsonDecodingMiddleware {
    /// Creates the middleware with the default 400 rejection status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reject_status: StatusCode::BAD_REQUEST,
        }
    }

    /// Sets the HTTP status used on rejection responses.
    #[must_use]
    pub fn with_reject_status(mut self, status: StatusCode) -> Self {
        self.reject_status = status;
        self
    }
}

impl Default for JsonDecodingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for JsonDecodingMiddleware {
    fn name(&self) -> &'static str {
        "json_decoding"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let bytes = body_bytes(&request).await;
            if bytes.is_empty() {
                return next.run(request).await;
            }

            if !request.content_type().contains(SUPPORTED_CONTENT_TYPE) {
                return next.run(request).await;
            }

            match serde_json::from_slice::<serde_json::Value>(&bytes) {
                Ok(value) => next.run(request.with_parsed_body(value)).await,
                Err(err) => {
                    tracing::error!(error = %err, "Invalid JSON payload");
                    Response::envelope(
                        self.reject_status,
                        &ErrorEnvelope::bad_request("Invalid JSON payload"),
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
    use http_body_util::Full;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = http::Request::builder().method("POST").uri("/hook");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    fn capturing_handler(
        calls: Arc<AtomicUsize>,
        parsed: Arc<Mutex<Option<serde_json::Value>>>,
    ) -> Next<'static> {
        Next::handler(move |req: Request| {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                *parsed.lock().unwrap() = req.parsed_body().cloned();
                http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        })
    }

    #[tokio::test]
    async fn test_empty_body_forwards_untouched() {
        let middleware = JsonDecodingMiddleware::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let parsed = Arc::new(Mutex::new(None));

        let response = middleware
            .process(
                request(Some("application/json"), ""),
                capturing_handler(calls.clone(), parsed.clone()),
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(parsed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_json_content_type_forwards_untouched() {
        let middleware = JsonDecodingMiddleware::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let parsed = Arc::new(Mutex::new(None));

        middleware
            .process(
                request(Some("text/plain"), "plain text"),
                capturing_handler(calls.clone(), parsed.clone()),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(parsed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_valid_json_is_attached() {
        let middleware = JsonDecodingMiddleware::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let parsed = Arc::new(Mutex::new(None));

        middleware
            .process(
                request(Some("application/json"), r#"{"a": 1}"#),
                capturing_handler(calls.clone(), parsed.clone()),
            )
            .await;

        assert_eq!(parsed.lock().unwrap().as_ref(), Some(&json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_malformed_json_rejects_with_400() {
        let middleware = JsonDecodingMiddleware::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let parsed = Arc::new(Mutex::new(None));

        let response = middleware
            .process(
                request(Some("application/json"), "{:"),
                capturing_handler(calls.clone(), parsed),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_middleware_name() {
        assert_eq!(JsonDecodingMiddleware::new().name(), "json_decoding");
    }
}
