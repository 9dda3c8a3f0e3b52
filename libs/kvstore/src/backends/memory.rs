//! In-memory (`dict`) backend for tests and local runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::KvBackend;
use crate::error::{KvError, KvResult};

pub const PROTOCOL: &str = "dict";

/// Options of the `dict` backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DictConfig {
    /// Records loaded into the map at construction.
    pub init_data: Map<String, Value>,
}

/// Ordered in-memory map. Contents live as long as the backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    data: RwLock<BTreeMap<String, Value>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: DictConfig) -> Self {
        Self {
            data: RwLock::new(config.init_data.into_iter().collect()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

/// `dict` constructor for the [`BackendFactory`](crate::BackendFactory).
///
/// # Errors
/// [`KvError::InvalidConfig`] if the options do not form a [`DictConfig`].
pub fn construct(options: &Value) -> KvResult<Arc<dyn KvBackend>> {
    let config = DictConfig::deserialize(options).map_err(|source| KvError::InvalidConfig {
        protocol: PROTOCOL.to_owned(),
        source,
    })?;
    Ok(Arc::new(MemoryBackend::from_config(config)))
}

#[async_trait]
impl KvBackend for MemoryBackend {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    async fn get(&self, key: &str) -> KvResult<Option<Value>> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> KvResult<()> {
        self.data.write().insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<bool> {
        Ok(self.data.write().remove(key).is_some())
    }

    async fn scan(&self, pattern: &str) -> KvResult<Vec<String>> {
        let matcher = glob::Pattern::new(pattern).map_err(|e| KvError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(self
            .data
            .read()
            .keys()
            .filter(|k| matcher.matches(k))
            .cloned()
            .collect())
    }
}
