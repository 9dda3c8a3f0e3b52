//! Named query arguments.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors raised while decoding query arguments inside a handler.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("missing required argument '{name}'")]
    Missing { name: String },

    #[error("invalid argument '{name}'")]
    Invalid {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Named arguments passed along with a query key.
///
/// A JSON `null` is treated the same as an absent argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryArgs(Map<String, Value>);

impl QueryArgs {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds (or replaces) an argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Adds an argument only when `value` is `Some`.
    #[must_use]
    pub fn with_opt<V: Into<Value>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Decodes a required argument.
    ///
    /// # Errors
    /// [`ArgsError::Missing`] if absent or `null`, [`ArgsError::Invalid`] if
    /// the value does not decode as `T`.
    pub fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T, ArgsError> {
        self.optional(name)?.ok_or_else(|| ArgsError::Missing {
            name: name.to_owned(),
        })
    }

    /// Decodes an optional argument.
    ///
    /// # Errors
    /// [`ArgsError::Invalid`] if present but not decodable as `T`.
    pub fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ArgsError> {
        self.get(name)
            .map(|v| {
                T::deserialize(v).map_err(|source| ArgsError::Invalid {
                    name: name.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for QueryArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
