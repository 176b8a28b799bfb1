//! # Hermes Test
//!
//! Test utilities for the Hermes middleware library: build requests
//! in-memory, run them through middleware, and assert on the resulting
//! response and side effects - no network connections or port binding.
//!
//! ## Example
//!
//! ```ignore
//! use hermes_middleware::stages::{DecodingMiddleware, JsonBodyDecoder};
//! use hermes_middleware::Middleware;
//! use hermes_test::{TestHandler, TestRequest, TestResponse};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_decodes_push_message() {
//!     let middleware = DecodingMiddleware::new(JsonBodyDecoder, ["POST"]);
//!     let handler = TestHandler::new();
//!
//!     let request = TestRequest::post("/push")
//!         .json(&json!({"message": {"attributes": {}}}))
//!         .build()
//!         .unwrap()
//!         .into_http_request();
//!
//!     let response = middleware.process(request, handler.next()).await;
//!
//!     TestResponse::from_http(response).await.unwrap().assert_status_code(200);
//!     assert_eq!(handler.calls(), 1);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod request;
mod response;
mod sinks;

pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
pub use sinks::{
    FailingTokenVerifier, RecordingCorrelationResolver, RecordingVariablesStore,
    StaticTokenVerifier, TestHandler,
};
