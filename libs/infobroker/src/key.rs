//! Dotted query keys (`infrastructure.node_instances`, `node.find`, ...).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BrokerError;

/// A validated, dot-separated query key.
///
/// Each segment is non-empty and consists of ASCII alphanumerics, `_` or `-`.
/// `QueryKey` borrows as `str`, so maps keyed by it can be probed with plain
/// string slices.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    /// Parses and validates a query key.
    ///
    /// # Errors
    /// Returns [`BrokerError::InvalidKey`] if the key is empty or has an empty
    /// or malformed segment.
    pub fn parse(raw: &str) -> Result<Self, BrokerError> {
        if raw.is_empty() {
            return Err(BrokerError::invalid_key(raw, "key is empty"));
        }
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(BrokerError::invalid_key(raw, "empty segment"));
            }
            if let Some(ch) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            {
                return Err(BrokerError::invalid_key(
                    raw,
                    format!("unexpected character {ch:?} in segment '{segment}'"),
                ));
            }
        }
        Ok(Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns `true` if `prefix` names this key or one of its ancestors
    /// (`infrastructure` is a namespace of `infrastructure.name`).
    #[must_use]
    pub fn is_within(&self, prefix: &str) -> bool {
        self.0 == prefix
            || (self.0.starts_with(prefix) && self.0[prefix.len()..].starts_with('.'))
    }
}

impl fmt::Debug for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QueryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for QueryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for QueryKey {
    type Error = BrokerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for QueryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for QueryKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
