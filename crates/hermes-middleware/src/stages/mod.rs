//! Middleware implementations.
//!
//! Each stage composes the shared primitives - context generation, path
//! extraction, the envelope response builder - with one side effect:
//!
//! - [`decode`] / [`json`] - parse the body into the parsed-body slot
//! - [`value_extraction`] - publish a payload value to a variables store
//! - [`correlation`] - override the ambient correlation ID
//! - [`value_to_header`] - promote payload values into a request header
//! - [`header_token`] / [`bearer`] - token checks guarding the endpoint

pub mod bearer;
pub mod correlation;
pub mod decode;
pub mod header_token;
pub mod json;
pub mod value_extraction;
pub mod value_to_header;

// Re-export main types
pub use bearer::{BearerTokenVerificationMiddleware, TokenVerifier};
pub use correlation::{CorrelationIdOverrideMiddleware, CorrelationIdResolver};
pub use decode::{BodyDecoder, DecodingMiddleware, JsonBodyDecoder};
pub use header_token::HeaderTokenValidationMiddleware;
pub use json::JsonDecodingMiddleware;
pub use value_extraction::{EnvVariablesStorage, PayloadValueExtractionMiddleware, VariablesStore};
pub use value_to_header::PayloadValueToHeaderMiddleware;
