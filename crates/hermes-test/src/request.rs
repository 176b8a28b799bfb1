//! Test request building.

use crate::error::TestError;
use bytes::Bytes;
use hermes_middleware::Request;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use serde::Serialize;
use serde_json::json;

/// A test request that can be run through middleware.
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
}

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Converts this request into the middleware [`Request`] type.
    pub fn into_http_request(self) -> Request {
        let mut builder = http::Request::builder().method(self.method).uri(self.uri);

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        builder.body(Full::new(self.body)).expect("valid request")
    }
}

/// Builder for constructing test requests.
#[must_use]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Appends a header to the request.
    ///
    /// Repeated names accumulate into a multi-valued header, which is
    /// what context-from-header tests need.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref()).expect("valid header name");
        let value = HeaderValue::try_from(value.as_ref()).expect("valid header value");
        self.headers.append(name, value);
        self
    }

    /// Sets the Content-Type header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the Authorization header with a Bearer token.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the request body as JSON.
    ///
    /// This also sets the `Content-Type` header to `application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        let bytes = serde_json::to_vec(value).expect("JSON serialization should succeed");
        self.body = Some(Bytes::from(bytes));
        self.content_type("application/json")
    }

    /// Sets the body to a push message envelope with the given attribute
    /// values, in the shape decoding and context tests expect.
    pub fn push_message(
        self,
        event_type: &str,
        occurred_on: &str,
        correlation_id: &str,
        target: &str,
    ) -> Self {
        self.json(&json!({
            "message": {
                "attributes": {
                    "eventType": event_type,
                    "eventOccurredOn": occurred_on,
                    "correlationId": correlation_id,
                    "target": target,
                }
            }
        }))
    }

    /// Builds the test request.
    pub fn build(self) -> Result<TestRequest, TestError> {
        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_request() {
        let request = TestRequest::post("/push").build().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.uri.path(), "/push");
    }

    #[test]
    fn test_repeated_headers_accumulate() {
        let request = TestRequest::post("/push")
            .header("x-context", "a=1")
            .header("x-context", "raw")
            .build()
            .unwrap();

        let values: Vec<_> = request.headers.get_all("x-context").iter().collect();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_bearer_token() {
        let request = TestRequest::post("/push")
            .bearer_token("my_token")
            .build()
            .unwrap();

        assert_eq!(
            request.headers.get("Authorization").unwrap(),
            "Bearer my_token"
        );
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = TestRequest::post("/push")
            .json(&json!({"a": 1}))
            .build()
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type").unwrap(),
            "application/json"
        );
        assert_eq!(request.body.as_ref(), br#"{"a":1}"#);
    }

    #[test]
    fn test_push_message_shape() {
        let request = TestRequest::post("/push")
            .push_message("user.registered", "2024-05-01T10:00:00Z", "corr-1", "billing")
            .build()
            .unwrap();

        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["message"]["attributes"]["eventType"], "user.registered");
        assert_eq!(body["message"]["attributes"]["target"], "billing");
    }

    #[test]
    fn test_into_http_request() {
        let request = TestRequest::post("/push")
            .header("x-test", "value")
            .build()
            .unwrap()
            .into_http_request();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.headers().get("x-test").unwrap(), "value");
    }

    #[test]
    fn test_invalid_uri() {
        let result = TestRequest::get("not a uri").build();
        assert!(result.is_err());
    }
}
