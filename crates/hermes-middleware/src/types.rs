//! Common request and response types.
//!
//! Requests carry buffered `Full<Bytes>` bodies; the body can therefore
//! be read any number of times without consuming it, which is what lets
//! decoding middleware and context generators inspect the payload while
//! leaving it intact for downstream handlers.

use bytes::Bytes;
use hermes_core::ErrorEnvelope;
use http::StatusCode;
use http_body_util::{BodyExt, Full};

/// The HTTP request type processed by the middleware chain.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by the middleware chain.
pub type Response = http::Response<Full<Bytes>>;

/// The decoded payload attached to a request by decoding middleware.
///
/// Stored in the request's extensions; downstream middleware read it via
/// [`RequestExt::parsed_body`].
#[derive(Debug, Clone)]
pub struct ParsedBody(pub serde_json::Value);

/// Collects the request body into contiguous bytes.
///
/// The body is cloned before collection, so the request keeps its body
/// and downstream handlers can still read it.
pub async fn body_bytes(request: &Request) -> Bytes {
    request
        .body()
        .clone()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default()
}

/// Extension methods on [`Request`].
pub trait RequestExt {
    /// Returns the parsed body attached by decoding middleware, if any.
    fn parsed_body(&self) -> Option<&serde_json::Value>;

    /// Returns the request with the given value attached as its parsed
    /// body.
    #[must_use]
    fn with_parsed_body(self, value: serde_json::Value) -> Self;

    /// Returns all values of the named header that are valid UTF-8, in
    /// order.
    fn header_values(&self, name: &str) -> Vec<&str>;

    /// Returns the first `Content-Type` header value, or an empty string
    /// when absent.
    fn content_type(&self) -> &str;
}

impl RequestExt for Request {
    fn parsed_body(&self) -> Option<&serde_json::Value> {
        self.extensions().get::<ParsedBody>().map(|body| &body.0)
    }

    fn with_parsed_body(mut self, value: serde_json::Value) -> Self {
        self.extensions_mut().insert(ParsedBody(value));
        self
    }

    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers()
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    fn content_type(&self) -> &str {
        self.headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }
}

/// Extension trait for building rejection responses.
pub trait ResponseExt {
    /// Builds the uniform rejection response: the given status, header
    /// `Content-Type: application/json`, and the serialized envelope as
    /// body.
    fn envelope(status: StatusCode, envelope: &ErrorEnvelope) -> Response;
}

impl ResponseExt for Response {
    fn envelope(status: StatusCode, envelope: &ErrorEnvelope) -> Response {
        let body = serde_json::to_vec(envelope).unwrap_or_default();

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("failed to build envelope response")
    }
}

/// Renders a JSON scalar for storage in contexts, variables, and header
/// lines. Strings are taken verbatim, null becomes the empty string, and
/// anything else is rendered as compact JSON.
pub(crate) fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
