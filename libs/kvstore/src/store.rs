//! Typed handle over a [`KvBackend`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::KvBackend;
use crate::config::KvStoreConfig;
use crate::error::{KvError, KvResult};
use crate::factory::BackendFactory;

/// Extracts the identifier segment from a colon-separated physical key.
///
/// Two segments (`backend:B`) yield the first one; any other count yields the
/// second (`infra:X:state` -> `X`). A key without separators is returned whole.
#[must_use]
pub fn cut_id(key: &str) -> &str {
    let parts: Vec<&str> = key.split(':').collect();
    match parts.as_slice() {
        [first, _] => *first,
        [_, second, _, ..] => *second,
        _ => key,
    }
}

/// Cloneable, backend-agnostic key/value store.
#[derive(Clone)]
pub struct KeyValueStore {
    backend: Arc<dyn KvBackend>,
}

impl KeyValueStore {
    #[must_use]
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Builds a store from configuration using the default backend set.
    ///
    /// # Errors
    /// [`KvError::UnknownProtocol`] or [`KvError::InvalidConfig`].
    pub fn from_config(config: &KvStoreConfig) -> KvResult<Self> {
        BackendFactory::with_defaults().create(config).map(Self::new)
    }

    #[must_use]
    pub fn protocol(&self) -> &'static str {
        self.backend.protocol()
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn KvBackend> {
        &self.backend
    }

    /// Reads and decodes the value under `key`.
    ///
    /// # Errors
    /// [`KvError::NotFound`] if absent, [`KvError::Codec`] if it does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> KvResult<T> {
        self.try_get(key).await?.ok_or_else(|| KvError::not_found(key))
    }

    /// Reads the value under `key`, falling back to `default` when absent.
    ///
    /// # Errors
    /// Backend and decoding failures; absence is not an error.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> KvResult<T> {
        Ok(self.try_get(key).await?.unwrap_or(default))
    }

    /// Reads the value under `key`, `None` when absent.
    ///
    /// # Errors
    /// Backend and decoding failures.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> KvResult<Option<T>> {
        match self.backend.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| KvError::codec(key, e)),
            None => Ok(None),
        }
    }

    /// Replaces the value under `key`.
    ///
    /// # Errors
    /// Encoding or backend failures.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> KvResult<()> {
        let value = serde_json::to_value(value).map_err(|e| KvError::codec(key, e))?;
        self.backend.set(key, value).await
    }

    /// Removes `key`, returning whether it existed.
    ///
    /// # Errors
    /// Backend failures.
    pub async fn delete(&self, key: &str) -> KvResult<bool> {
        self.backend.delete(key).await
    }

    /// Lists keys matching `pattern`, each passed through `transform`.
    ///
    /// # Errors
    /// Pattern or backend failures.
    pub async fn enumerate<F, R>(&self, pattern: &str, transform: F) -> KvResult<Vec<R>>
    where
        F: Fn(&str) -> R,
    {
        let keys = self.backend.scan(pattern).await?;
        Ok(keys.iter().map(|k| transform(k.as_str())).collect())
    }
}

impl fmt::Debug for KeyValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueStore")
            .field("protocol", &self.backend.protocol())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn cut_id_convention() {
        assert_eq!(cut_id("infra:X:state"), "X");
        assert_eq!(cut_id("infra:X:description"), "X");
        assert_eq!(cut_id("auth:ec2:alice"), "ec2");
        assert_eq!(cut_id("backend:ec2"), "backend");
        assert_eq!(cut_id("node_def:web"), "node_def");
        assert_eq!(cut_id("plain"), "plain");
        assert_eq!(cut_id(""), "");
    }
}
