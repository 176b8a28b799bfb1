//! # Hermes Middleware
//!
//! Request-processing middleware for pub/sub push deliveries.
//!
//! Each middleware inspects or transforms one HTTP request/response pair
//! and then either short-circuits with an error response or forwards to
//! the next handler in the chain:
//!
//! ```text
//! Request → TokenCheck → Decoding → ValueExtraction → CorrelationOverride → Handler
//!                │            │            │                  │
//!                └────────────┴────────────┴──────────────────┴──→ Reject (envelope)
//! ```
//!
//! ## Key Pieces
//!
//! | Piece | Purpose |
//! |-------|---------|
//! | [`Middleware`] / [`Next`]             | The chain seam every stage implements |
//! | [`ContextGenerator`]                  | Derives the logging context per request |
//! | [`stages::DecodingMiddleware`]        | Method/content-type gated body decoding |
//! | [`stages::PayloadValueExtractionMiddleware`] | Publishes a payload value to a store |
//! | [`stages::CorrelationIdOverrideMiddleware`]  | Overrides the ambient correlation ID |
//! | [`stages::PayloadValueToHeaderMiddleware`]   | Promotes payload values into a header |
//! | [`stages::HeaderTokenValidationMiddleware`]  | Static shared-secret check |
//! | [`stages::BearerTokenVerificationMiddleware`] | Remote ID-token verification |
//!
//! All rejections flow through [`ResponseExt::envelope`] and carry the
//! uniform `{"status", "message"}` JSON body. Middleware values are
//! immutable after construction and safe to share across concurrent
//! requests.

#![doc(html_root_url = "https://docs.rs/hermes-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod stages;
pub mod types;
pub mod verifier;

// Re-export main types at crate root
pub use context::{
    context_or_empty, ContextGenerator, EmptyContextGenerator, HeaderContextGenerator,
    MessageAttributesContextGenerator, PayloadContextGenerator, PayloadSource,
};
pub use middleware::{BoxFuture, Middleware, Next};
pub use types::{body_bytes, ParsedBody, Request, RequestExt, Response, ResponseExt};
