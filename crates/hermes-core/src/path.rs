//! Path-based extraction from nested JSON payloads.
//!
//! A [`PathSpec`] names a location inside a nested mapping as an ordered
//! sequence of keys. [`extract`] walks a payload along such a path and
//! either returns the value found at the end or a [`MissingKey`] error
//! naming the first absent key and the prefix traversed before it.
//!
//! # Example
//!
//! ```
//! use hermes_core::{extract, PathSpec};
//! use serde_json::json;
//!
//! let payload = json!({"message": {"attributes": {"target": "user-service"}}});
//! let path = PathSpec::parse("message.attributes.target");
//!
//! let value = extract(&payload, &path).unwrap();
//! assert_eq!(value, &json!("user-service"));
//! ```

use std::fmt;
use thiserror::Error;

/// An ordered sequence of keys describing how to descend into a nested
/// mapping.
///
/// A spec can be built from a dot-joined string or from an explicit list
/// of keys. An empty spec is representable; middleware that require a
/// non-empty path reject empty specs at construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSpec {
    keys: Vec<String>,
}

impl PathSpec {
    /// Parses a dot-joined path such as `"message.attributes.target"`.
    ///
    /// An empty input yields an empty spec.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self { keys: Vec::new() };
        }

        Self {
            keys: path.split('.').map(ToString::to_string).collect(),
        }
    }

    /// Builds a spec from an explicit sequence of keys.
    #[must_use]
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the keys in order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the number of keys in the spec.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the spec contains no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.join("."))
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// The separator used when joining a traversed key prefix into an error
/// message.
///
/// Different middleware variants historically used different separators;
/// each middleware exposes this as configuration instead of hard-coding
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySeparator {
    /// Join keys with `"."`.
    #[default]
    Dot,
    /// Join keys with `","`.
    Comma,
}

impl KeySeparator {
    /// Returns the separator string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dot => ".",
            Self::Comma => ",",
        }
    }
}

/// Error returned by [`extract`] when a key is absent.
///
/// `traversed` holds the keys that resolved successfully before the
/// failure; it is empty when the very first key was already missing.
/// Indexing into a non-mapping intermediate value (a scalar or a list)
/// surfaces as the same error kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing key [{key}] in path [{}]", .traversed.join("."))]
pub struct MissingKey {
    /// The first key that could not be resolved.
    pub key: String,
    /// The keys successfully consumed before the failure, in order.
    pub traversed: Vec<String>,
}

impl MissingKey {
    /// Joins the traversed prefix with the given separator.
    ///
    /// Returns an empty string when the first key already failed.
    #[must_use]
    pub fn traversed_path(&self, separator: KeySeparator) -> String {
        self.traversed.join(separator.as_str())
    }
}

/// Walks `payload` along `path` and returns the value at its end.
///
/// The payload is narrowed one key at a time. A key that is absent at the
/// current level, or an intermediate value that is not a JSON object,
/// stops the traversal immediately with a [`MissingKey`] error. An empty
/// path returns the payload itself.
pub fn extract<'a>(
    payload: &'a serde_json::Value,
    path: &PathSpec,
) -> Result<&'a serde_json::Value, MissingKey> {
    let mut current = payload;
    let mut traversed: Vec<String> = Vec::with_capacity(path.len());

    for key in path.keys() {
        match current.as_object().and_then(|map| map.get(key)) {
            Some(next) => {
                traversed.push(key.clone());
                current = next;
            }
            None => {
                return Err(MissingKey {
                    key: key.clone(),
                    traversed,
                })
            }
        }
    }

    Ok(current)
}
