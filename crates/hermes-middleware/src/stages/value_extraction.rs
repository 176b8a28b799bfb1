//! Payload value extraction into a variables store.

use crate::context::{context_or_empty, ContextGenerator, EmptyContextGenerator};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{value_to_string, Request, RequestExt, Response, ResponseExt};
use hermes_core::{extract, ConfigError, ErrorEnvelope, KeySeparator, PathSpec};
use http::StatusCode;
use std::sync::Arc;

/// Capability for storing extracted key/value pairs, typically into the
/// process environment or an equivalent per-request variable scope.
pub trait VariablesStore: Send + Sync + 'static {
    /// Stores `value` under `key`.
    fn store(&self, key: &str, value: &str);
}

/// Store backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVariablesStorage;

impl VariablesStore for EnvVariablesStorage {
    fn store(&self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

/// Middleware that extracts one value from the parsed payload and
/// publishes it to a [`VariablesStore`] under a configured key.
///
/// The extracted value must be a primitive; objects and arrays are
/// rejected. On success the original request is forwarded unchanged -
/// the extraction is purely a side effect.
///
/// # Example
///
/// ```ignore
/// use hermes_middleware::stages::{EnvVariablesStorage, PayloadValueExtractionMiddleware};
/// use hermes_core::PathSpec;
///
/// let middleware = PayloadValueExtractionMiddleware::new(
///     EnvVariablesStorage,
///     PathSpec::parse("message.attributes.target"),
///     "MESSAGE_TARGET",
/// )?;
/// ```
pub struct PayloadValueExtractionMiddleware<S> {
    store: S,
    path: PathSpec,
    store_key: String,
    context_generator: Arc<dyn ContextGenerator>,
    separator: KeySeparator,
    reject_status: StatusCode,
}

impl<S> std::fmt::Debug for PayloadValueExtractionMiddleware<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadValueExtractionMiddleware")
            .field("path", &self.path)
            .field("store_key", &self.store_key)
            .field("separator", &self.separator)
            .field("reject_status", &self.reject_status)
            .finish_non_exhaustive()
    }
}

impl<S: VariablesStore> PayloadValueExtractionMiddleware<S> {
    /// Creates the middleware.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPathSpec`] when `path` names no keys;
    /// an empty path would extract the whole payload, which is never a
    /// primitive.
    pub fn new(store: S, path: PathSpec, store_key: impl Into<String>) -> Result<Self, ConfigError> {
        if path.is_empty() {
            return Err(ConfigError::EmptyPathSpec);
        }

        Ok(Self {
            store,
            path,
            store_key: store_key.into(),
            context_generator: Arc::new(EmptyContextGenerator),
            separator: KeySeparator::Comma,
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
}

impl<S: VariablesStore> Middleware for PayloadValueExtractionMiddleware<S> {
    fn name(&self) -> &'static str {
        "payload_value_extraction"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let context = context_or_empty(self.context_generator.as_ref(), &request).await;

            let verdict = match request.parsed_body() {
                Some(payload) if payload.is_object() => match extract(payload, &self.path) {
                    Ok(value) if value.is_object() || value.is_array() => {
                        Err("Extracted value should be of a primitive type".to_string())
                    }
                    Ok(value) => Ok(value_to_string(value)),
                    Err(missing) => Err(format!(
                        "Missing key: [{}] in the payload path: [{}]",
                        missing.key,
                        missing.traversed_path(self.separator)
                    )),
                },
                _ => Err("No payload supplied".to_string()),
            };

            match verdict {
                Ok(value) => {
                    tracing::info!(
                        context = %context,
                        key = %self.store_key,
                        value = %value,
                        "Storing extracted payload value"
                    );
                    self.store.store(&self.store_key, &value);
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

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use hermes_core::ErrorEnvelope;
    use http_body_util::{BodyExt, Full};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        stored: Mutex<Vec<(String, String)>>,
    }

    impl VariablesStore for Arc<RecordingStore> {
        fn store(&self, key: &str, value: &str) {
            self.stored
                .lock()
                .unwrap()
                .push((key.to_string(), value.to_string()));
        }
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

    fn counting_handler(calls: Arc<AtomicUsize>) -> Next<'static> {
        Next::handler(move |_req| {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        })
    }

    async fn envelope_of(response: Response) -> ErrorEnvelope {
        let body = response
            .into_body()
            .collect()
            .await
            .map(http_body_util::Collected::to_bytes)
            .unwrap_or_default();
        serde_json::from_slice(&body).unwrap()
    }

    fn middleware(
        store: Arc<RecordingStore>,
        path: &str,
    ) -> PayloadValueExtractionMiddleware<Arc<RecordingStore>> {
        PayloadValueExtractionMiddleware::new(store, PathSpec::parse(path), "STORE_KEY").unwrap()
    }

    #[test]
    fn test_empty_path_is_a_configuration_error() {
        let err = PayloadValueExtractionMiddleware::new(
            Arc::new(RecordingStore::default()),
            PathSpec::default(),
            "STORE_KEY",
        )
        .unwrap_err();

        assert_eq!(err, ConfigError::EmptyPathSpec);
    }

    #[tokio::test]
    async fn test_stores_extracted_primitive_and_forwards() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store.clone(), "message.attributes.target");
        let calls = Arc::new(AtomicUsize::new(0));

        let request = request_with_payload(Some(json!({
            "message": {"attributes": {"target": "user-service"}}
        })));

        let response = mw.process(request, counting_handler(calls.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *store.stored.lock().unwrap(),
            vec![("STORE_KEY".to_string(), "user-service".to_string())]
        );
    }

    #[tokio::test]
    async fn test_numeric_value_is_rendered_as_string() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store.clone(), "count");
        let calls = Arc::new(AtomicUsize::new(0));

        mw.process(
            request_with_payload(Some(json!({"count": 42}))),
            counting_handler(calls),
        )
        .await;

        assert_eq!(
            *store.stored.lock().unwrap(),
            vec![("STORE_KEY".to_string(), "42".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_payload_rejects() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store.clone(), "a.b");
        let calls = Arc::new(AtomicUsize::new(0));

        let response = mw
            .process(request_with_payload(None), counting_handler(calls.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let envelope = envelope_of(response).await;
        assert_eq!(envelope.status, "Bad request");
        assert_eq!(envelope.message, "No payload supplied");
    }

    #[tokio::test]
    async fn test_non_object_payload_rejects() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store, "a.b");
        let calls = Arc::new(AtomicUsize::new(0));

        let response = mw
            .process(
                request_with_payload(Some(json!(["not", "a", "map"]))),
                counting_handler(calls),
            )
            .await;

        let envelope = envelope_of(response).await;
        assert_eq!(envelope.message, "No payload supplied");
    }

    #[tokio::test]
    async fn test_missing_key_names_prefix_with_comma_separator() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store, "key1.key2.key3");
        let calls = Arc::new(AtomicUsize::new(0));

        let response = mw
            .process(
                request_with_payload(Some(json!({"key1": {"key2": []}}))),
                counting_handler(calls.clone()),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let envelope = envelope_of(response).await;
        assert_eq!(
            envelope.message,
            "Missing key: [key3] in the payload path: [key1,key2]"
        );
    }

    #[tokio::test]
    async fn test_separator_is_configurable() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store, "key1.key2.key3").with_separator(KeySeparator::Dot);
        let calls = Arc::new(AtomicUsize::new(0));

        let response = mw
            .process(
                request_with_payload(Some(json!({"key1": {"key2": {}}}))),
                counting_handler(calls),
            )
            .await;

        let envelope = envelope_of(response).await;
        assert_eq!(
            envelope.message,
            "Missing key: [key3] in the payload path: [key1.key2]"
        );
    }

    #[tokio::test]
    async fn test_non_primitive_value_rejects() {
        let store = Arc::new(RecordingStore::default());
        let mw = middleware(store.clone(), "message");
        let calls = Arc::new(AtomicUsize::new(0));

        let response = mw
            .process(
                request_with_payload(Some(json!({"message": {"nested": true}}))),
                counting_handler(calls.clone()),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(store.stored.lock().unwrap().is_empty());

        let envelope = envelope_of(response).await;
        assert_eq!(
            envelope.message,
            "Extracted value should be of a primitive type"
        );
    }

    #[test]
    fn test_middleware_name() {
        let mw = middleware(Arc::new(RecordingStore::default()), "a");
        assert_eq!(mw.name(), "payload_value_extraction");
    }
}
