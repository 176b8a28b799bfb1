//! Request context generation.
//!
//! A [`ContextGenerator`] derives a flat [`Context`] map from a request,
//! used to correlate log lines with the message being processed.
//! Generators are pure with respect to the request: invoking one twice
//! yields the same context, so no per-request caching is needed and
//! generator values can be shared freely across concurrent requests.
//!
//! Middleware that use the context only for logging call
//! [`context_or_empty`], which degrades to an empty context on failure
//! instead of aborting the request.

use crate::middleware::BoxFuture;
use crate::types::{body_bytes, value_to_string, Request, RequestExt};
use hermes_core::{extract, Context, ContextError, DecodeError, PathSpec};
use indexmap::IndexMap;

/// The four attribute keys every push message envelope must carry.
const REQUIRED_ATTRIBUTES: [&str; 4] = ["eventType", "eventOccurredOn", "correlationId", "target"];

/// Capability for deriving a logging context from a request.
pub trait ContextGenerator: Send + Sync + 'static {
    /// Derives a context from the request.
    fn generate<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Context, ContextError>>;
}

/// Generates the context best-effort: failures are logged and degraded
/// to an empty context.
pub async fn context_or_empty(generator: &dyn ContextGenerator, request: &Request) -> Context {
    match generator.generate(request).await {
        Ok(context) => context,
        Err(err) => {
            tracing::error!(
                error = %err,
                "Context generation failed, continuing with an empty context"
            );
            Context::new()
        }
    }
}

/// Generator that always yields an empty context.
///
/// Used as the default when no generator is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContextGenerator;

impl ContextGenerator for EmptyContextGenerator {
    fn generate<'a>(&'a self, _request: &'a Request) -> BoxFuture<'a, Result<Context, ContextError>> {
        Box::pin(async { Ok(Context::new()) })
    }
}

/// Generator that reads `key=value` lines from a configured header.
///
/// Every value of the header is inspected in order: lines containing `=`
/// are split on the first occurrence into a keyed entry (last write wins
/// for repeated keys), other lines become positional entries.
#[derive(Debug, Clone)]
pub struct HeaderContextGenerator {
    header_name: String,
}

impl HeaderContextGenerator {
    /// Creates a generator reading the given header.
    #[must_use]
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }
}

impl ContextGenerator for HeaderContextGenerator {
    fn generate<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Context, ContextError>> {
        Box::pin(async move {
            let mut context = Context::new();
            for line in request.header_values(&self.header_name) {
                match line.split_once('=') {
                    Some((key, value)) => context.set(key, value),
                    None => context.push(line),
                }
            }

            Ok(context)
        })
    }
}

/// Generator that reads the standard push message attribute envelope.
///
/// The request body must parse as JSON of the shape
/// `{"message": {"attributes": {...}}}` with all of `eventType`,
/// `eventOccurredOn`, `correlationId` and `target` present under the
/// attributes. The generated context uses the fixed output keys
/// `eventType`, `occurredOn`, `correlationId` and `target`.
///
/// Failures name the first missing key: `message`, then
/// `message.attributes`, then the aggregate of absent attribute keys.
/// The body read is non-destructive.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAttributesContextGenerator;

impl ContextGenerator for MessageAttributesContextGenerator {
    fn generate<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Context, ContextError>> {
        Box::pin(async move {
            let bytes = body_bytes(request).await;
            let decoded: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(DecodeError::from)?;

            let message = decoded
                .as_object()
                .and_then(|map| map.get("message"))
                .ok_or_else(|| ContextError::MissingKey {
                    path: "message".to_string(),
                })?;

            let attributes = message
                .as_object()
                .and_then(|map| map.get("attributes"))
                .and_then(serde_json::Value::as_object)
                .ok_or_else(|| ContextError::MissingKey {
                    path: "message.attributes".to_string(),
                })?;

            let missing: Vec<String> = REQUIRED_ATTRIBUTES
                .iter()
                .filter(|key| !attributes.contains_key(**key))
                .map(ToString::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(ContextError::MissingAttributes { keys: missing });
            }

            let mut context = Context::new();
            context.set("eventType", value_to_string(&attributes["eventType"]));
            context.set("occurredOn", value_to_string(&attributes["eventOccurredOn"]));
            context.set("correlationId", value_to_string(&attributes["correlationId"]));
            context.set("target", value_to_string(&attributes["target"]));

            Ok(context)
        })
    }
}

/// Where [`PayloadContextGenerator`] reads its payload from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadSource {
    /// The parsed body attached by decoding middleware.
    #[default]
    ParsedBody,
    /// The buffered request body, parsed as JSON on each invocation.
    RawBody,
}

/// Generator that maps configured dot-paths onto context keys.
///
/// Each entry of the configured mapping is extracted from the payload
/// independently. Any missing key fails the whole generation with a
/// single aggregate error naming the full configured path list; this is
/// deliberately coarser than the path extractor's own error.
#[derive(Debug, Clone)]
pub struct PayloadContextGenerator {
    mapping: IndexMap<String, PathSpec>,
    source: PayloadSource,
}

impl PayloadContextGenerator {
    /// Creates a generator reading the parsed-body slot.
    #[must_use]
    pub fn from_parsed_body(mapping: IndexMap<String, PathSpec>) -> Self {
        Self {
            mapping,
            source: PayloadSource::ParsedBody,
        }
    }

    /// Creates a generator parsing the buffered body as JSON.
    #[must_use]
    pub fn from_raw_body(mapping: IndexMap<String, PathSpec>) -> Self {
        Self {
            mapping,
            source: PayloadSource::RawBody,
        }
    }

    fn configured_paths(&self) -> Vec<String> {
        self.mapping.values().map(ToString::to_string).collect()
    }
}

impl ContextGenerator for PayloadContextGenerator {
    fn generate<'a>(&'a self, request: &'a Request) -> BoxFuture<'a, Result<Context, ContextError>> {
        Box::pin(async move {
            let payload: serde_json::Value = match self.source {
                PayloadSource::ParsedBody => request
                    .parsed_body()
                    .cloned()
                    .unwrap_or(serde_json::Value::Null),
                PayloadSource::RawBody => {
                    serde_json::from_slice(&body_bytes(request).await).map_err(DecodeError::from)?
                }
            };

            let mut context = Context::new();
            for (output_key, path) in &self.mapping {
                match extract(&payload, path) {
                    Ok(value) => context.set(output_key.clone(), value_to_string(value)),
                    Err(_) => {
                        return Err(ContextError::StructureNotFound {
                            paths: self.configured_paths(),
                        })
                    }
                }
            }

            Ok(context)
        })
    }
}
