//! # Hermes
//!
//! **Composable request-processing middleware for pub/sub push
//! deliveries**
//!
//! Hermes provides the middleware a service mounts in front of its push
//! endpoint:
//!
//! - **Token checks** - static header tokens and remotely verified
//!   bearer tokens
//! - **Payload decoding** - method/content-type gated JSON decoding into
//!   a parsed-body slot
//! - **Value extraction** - publishing payload values into variable
//!   stores, correlation-id resolvers, or request headers
//! - **Log correlation** - request contexts derived from headers or the
//!   message envelope, attached to every log line
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//!
//! let decode = DecodingMiddleware::new(JsonBodyDecoder, ["POST"])
//!     .with_context_generator(MessageAttributesContextGenerator);
//!
//! let extract = PayloadValueExtractionMiddleware::new(
//!     EnvVariablesStorage,
//!     PathSpec::parse("message.attributes.target"),
//!     "MESSAGE_TARGET",
//! )?;
//!
//! // Chain: decode → extract → handler
//! let response = decode
//!     .process(request, Next::new(&extract, Next::handler(handler)))
//!     .await;
//! ```
//!
//! ## Control Flow
//!
//! Every middleware generates its logging context, performs its gating
//! checks, attempts its core operation, and on success forwards the
//! (possibly mutated) request to the next handler exactly once. On
//! failure it returns a uniform `{"status", "message"}` JSON envelope
//! immediately, never invoking the next handler.

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use hermes_core as core;

// Re-export middleware types
pub use hermes_middleware as middleware;

// Re-export telemetry types
pub use hermes_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use hermes_core::{
        extract, ConfigError, Context, ContextError, DecodeError, ErrorEnvelope, KeySeparator,
        MissingKey, PathSpec, VerifyError,
    };

    pub use hermes_middleware::{
        BoxFuture, ContextGenerator, EmptyContextGenerator, HeaderContextGenerator,
        MessageAttributesContextGenerator, Middleware, Next, ParsedBody, PayloadContextGenerator,
        Request, RequestExt, Response, ResponseExt,
    };

    pub use hermes_middleware::stages::{
        BearerTokenVerificationMiddleware, BodyDecoder, CorrelationIdOverrideMiddleware,
        CorrelationIdResolver, DecodingMiddleware, EnvVariablesStorage,
        HeaderTokenValidationMiddleware, JsonBodyDecoder, JsonDecodingMiddleware,
        PayloadValueExtractionMiddleware, PayloadValueToHeaderMiddleware, TokenVerifier,
        VariablesStore,
    };

    pub use hermes_middleware::verifier::GoogleTokenInfoVerifier;

    pub use hermes_telemetry::{init_logging, LogConfig};
}
