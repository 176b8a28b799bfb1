//! Request context attached to log lines.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// An ordered key/value map carrying contextual metadata for one request.
///
/// Contexts are built by a context generator once per middleware
/// invocation and attached to every log line that middleware emits, so
/// operators can correlate log output with the message that produced it.
///
/// Entries keep insertion order. Setting an existing key overwrites its
/// value (last write wins). Lines without an explicit key are pushed as
/// positional entries keyed by an auto-incrementing index, mirroring how
/// header-derived contexts treat lines that carry no `=`.
///
/// # Example
///
/// ```
/// use hermes_core::Context;
///
/// let mut ctx = Context::new();
/// ctx.set("eventType", "user.registered");
/// ctx.push("raw-line");
///
/// assert_eq!(ctx.get("eventType"), Some("user.registered"));
/// assert_eq!(ctx.get("0"), Some("raw-line"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Context {
    #[serde(flatten)]
    entries: IndexMap<String, String>,
    #[serde(skip)]
    next_index: usize,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a keyed entry. An existing key is overwritten.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Appends a positional entry keyed by the next integer index.
    pub fn push(&mut self, value: impl Into<String>) {
        self.entries.insert(self.next_index.to_string(), value.into());
        self.next_index += 1;
    }

    /// Returns the value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl fmt::Display for Context {
    /// Renders the context as compact JSON for structured log fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).unwrap_or_default();
        write!(f, "{rendered}")
    }
}

impl FromIterator<(String, String)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            next_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut ctx = Context::new();
        ctx.set("correlationId", "abc-123");

        assert_eq!(ctx.get("correlationId"), Some("abc-123"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let mut ctx = Context::new();
        ctx.set("key", "first");
        ctx.set("key", "second");

        assert_eq!(ctx.get("key"), Some("second"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_positional_entries() {
        let mut ctx = Context::new();
        ctx.set("a", "1");
        ctx.push("raw");
        ctx.push("another");

        assert_eq!(ctx.get("0"), Some("raw"));
        assert_eq!(ctx.get("1"), Some("another"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut ctx = Context::new();
        ctx.set("b", "2");
        ctx.set("a", "1");
        ctx.push("raw");

        let keys: Vec<&str> = ctx.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a", "0"]);
    }

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.to_string(), "{}");
    }

    #[test]
    fn test_display_is_compact_json() {
        let mut ctx = Context::new();
        ctx.set("a", "1");
        ctx.set("b", "2");

        assert_eq!(ctx.to_string(), r#"{"a":"1","b":"2"}"#);
    }
}
