//! Core middleware trait and chain types.
//!
//! This module defines the [`Middleware`] trait that all request
//! processors implement. A middleware inspects or transforms one
//! request/response pair and then either short-circuits with its own
//! response or forwards to the next handler via [`Next`].
//!
//! # Example
//!
//! ```ignore
//! use hermes_middleware::{BoxFuture, Middleware, Next, Request, Response};
//!
//! struct LoggingMiddleware;
//!
//! impl Middleware for LoggingMiddleware {
//!     fn name(&self) -> &'static str {
//!         "logging"
//!     }
//!
//!     fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             tracing::info!(method = %request.method(), "Request received");
//!             next.run(request).await
//!         })
//!     }
//! }
//! ```

use crate::types::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core middleware trait.
///
/// Middleware values are constructed once and shared across many
/// concurrent requests, so implementations must not hold per-request
/// mutable state; everything derived from a request lives in local
/// variables or on the request value itself.
///
/// # Invariants
///
/// - A middleware calls `next.run()` at most once.
/// - On a reject path the next handler is never invoked; the middleware
///   returns its own response.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the unique name of this middleware.
    ///
    /// This name is used for logging and debugging.
    fn name(&self) -> &'static str;

    /// Processes the request through this middleware.
    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response>;
}

/// Callback to invoke the next middleware or handler in the chain.
///
/// Consuming `run` ensures the rest of the chain executes at most once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware to process.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain - invoke the handler.
    Handler(Box<dyn FnOnce(Request) -> BoxFuture<'static, Response> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given middleware before the
    /// rest of the chain.
    #[must_use]
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the handler.
    #[must_use]
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next middleware or handler in the chain.
    ///
    /// This consumes `self` to ensure it can only be called once.
    pub async fn run(self, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(request, *next).await,
            NextInner::Handler(handler) => handler(request).await,
        }
    }
}
