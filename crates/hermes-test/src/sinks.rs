//! Recording sinks, static verifiers, and the counting test handler.
//!
//! These are the in-memory doubles for the external collaborators the
//! middleware talk to: the variables store, the correlation-id resolver,
//! the token verifier, and the next handler itself.

use bytes::Bytes;
use hermes_core::VerifyError;
use hermes_middleware::stages::{CorrelationIdResolver, TokenVerifier, VariablesStore};
use hermes_middleware::{BoxFuture, Next, Request};
use http::StatusCode;
use http_body_util::Full;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A [`VariablesStore`] that records every stored pair.
///
/// Clones share the same underlying storage, so a test can keep one
/// handle while handing another to the middleware.
#[derive(Debug, Clone, Default)]
pub struct RecordingVariablesStore {
    stored: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingVariablesStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored pairs in order.
    #[must_use]
    pub fn stored(&self) -> Vec<(String, String)> {
        self.stored.lock().clone()
    }
}

impl VariablesStore for RecordingVariablesStore {
    fn store(&self, key: &str, value: &str) {
        self.stored.lock().push((key.to_string(), value.to_string()));
    }
}

/// A [`CorrelationIdResolver`] that records every stored value.
#[derive(Debug, Clone, Default)]
pub struct RecordingCorrelationResolver {
    stored: Arc<Mutex<Vec<String>>>,
}

impl RecordingCorrelationResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored correlation IDs in order.
    #[must_use]
    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().clone()
    }
}

impl CorrelationIdResolver for RecordingCorrelationResolver {
    fn store(&self, value: &str) {
        self.stored.lock().push(value.to_string());
    }
}

/// A [`TokenVerifier`] with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticTokenVerifier {
    valid: bool,
}

impl StaticTokenVerifier {
    /// A verifier that accepts every token.
    #[must_use]
    pub fn valid() -> Self {
        Self { valid: true }
    }

    /// A verifier that rejects every token.
    #[must_use]
    pub fn invalid() -> Self {
        Self { valid: false }
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify<'a>(&'a self, _token: &'a str) -> BoxFuture<'a, Result<bool, VerifyError>> {
        let valid = self.valid;
        Box::pin(async move { Ok(valid) })
    }
}

/// A [`TokenVerifier`] that always fails with a transport-style error.
#[derive(Debug, Clone)]
pub struct FailingTokenVerifier {
    message: String,
}

impl FailingTokenVerifier {
    /// Creates a verifier failing with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingTokenVerifier {
    fn default() -> Self {
        Self::new("verification backend unreachable")
    }
}

impl TokenVerifier for FailingTokenVerifier {
    fn verify<'a>(&'a self, _token: &'a str) -> BoxFuture<'a, Result<bool, VerifyError>> {
        Box::pin(async move { Err(VerifyError::new(self.message.clone())) })
    }
}

/// A terminal handler that counts invocations and captures the request
/// it received.
///
/// Lets tests assert both that the chain forwarded exactly once and what
/// the forwarded request looked like after middleware mutations.
#[derive(Debug, Clone, Default)]
pub struct TestHandler {
    calls: Arc<AtomicUsize>,
    request: Arc<Mutex<Option<Request>>>,
}

impl TestHandler {
    /// Creates a handler that has not been called yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a terminal [`Next`] that records into this handler and
    /// responds `200 OK` with body `OK`.
    #[must_use]
    pub fn next(&self) -> Next<'static> {
        let calls = self.calls.clone();
        let slot = self.request.clone();

        Next::handler(move |request: Request| {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                *slot.lock() = Some(request);

                http::Response::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from_static(b"OK")))
                    .expect("valid response")
            })
        })
    }

    /// Returns how many times the handler ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Takes the captured request, if the handler ran.
    #[must_use]
    pub fn take_request(&self) -> Option<Request> {
        self.request.lock().take()
    }
}
