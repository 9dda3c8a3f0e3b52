//! Protocol name -> backend constructor registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::backend::KvBackend;
use crate::backends::{memory, redis};
use crate::config::KvStoreConfig;
use crate::error::{KvError, KvResult};

/// Builds a backend from its (still untyped) options.
pub type BackendConstructor = fn(&Value) -> KvResult<Arc<dyn KvBackend>>;

/// Maps protocol names to backend constructors.
///
/// New backends are added with [`BackendFactory::register`]; callers only ever
/// see the resulting [`KvBackend`].
#[derive(Clone, Default)]
pub struct BackendFactory {
    constructors: BTreeMap<String, BackendConstructor>,
}

impl BackendFactory {
    /// An empty factory with no protocols.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory knowing `dict` and `redis`.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(memory::PROTOCOL, memory::construct);
        factory.register(redis::PROTOCOL, redis::construct);
        factory
    }

    /// Registers (or overrides) the constructor for `protocol`.
    pub fn register(&mut self, protocol: impl Into<String>, constructor: BackendConstructor) {
        self.constructors.insert(protocol.into(), constructor);
    }

    /// Registered protocol names, sorted.
    #[must_use]
    pub fn protocols(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Builds the backend selected by `config`.
    ///
    /// # Errors
    /// [`KvError::UnknownProtocol`] or the constructor's
    /// [`KvError::InvalidConfig`].
    pub fn create(&self, config: &KvStoreConfig) -> KvResult<Arc<dyn KvBackend>> {
        let protocol = config.effective_protocol();
        let constructor =
            self.constructors
                .get(protocol)
                .ok_or_else(|| KvError::UnknownProtocol {
                    protocol: protocol.to_owned(),
                })?;
        let backend = constructor(&config.options_value())?;
        tracing::info!(protocol, "key/value backend created");
        Ok(backend)
    }
}

impl std::fmt::Debug for BackendFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendFactory")
            .field("protocols", &self.protocols())
            .finish()
    }
}
