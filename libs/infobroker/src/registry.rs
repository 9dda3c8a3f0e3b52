//! Key registry: built once at startup, immutable afterwards.
//!
//! Providers are added through [`RegistryBuilder`]; every key is validated and
//! checked for duplicates at registration time, so a successfully built
//! [`Registry`] maps each key to exactly one handler.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::args::QueryArgs;
use crate::broker::InfoBroker;
use crate::error::{BrokerError, BrokerResult};
use crate::key::QueryKey;
use crate::provider::{Handler, HandlerFuture, InfoProvider};

type ErasedCall = Arc<dyn Fn(QueryArgs) -> HandlerFuture + Send + Sync>;

/// A handler bound to its owning provider instance.
#[derive(Clone)]
pub struct HandlerBinding {
    key: QueryKey,
    provider_name: Arc<str>,
    provider: Arc<dyn Any + Send + Sync>,
    call: ErasedCall,
}

impl HandlerBinding {
    fn new<P: InfoProvider>(key: QueryKey, provider: &Arc<P>, handler: Handler<P>) -> Self {
        let owner = Arc::clone(provider);
        let call: ErasedCall =
            Arc::new(move |args: QueryArgs| -> HandlerFuture { handler(Arc::clone(&owner), args) });
        Self {
            key,
            provider_name: Arc::from(provider.provider_name()),
            provider: Arc::clone(provider) as Arc<dyn Any + Send + Sync>,
            call,
        }
    }

    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    /// Returns `true` if this binding dispatches to exactly `provider`.
    #[must_use]
    pub fn is_owned_by<P: InfoProvider>(&self, provider: &Arc<P>) -> bool {
        self.provider
            .downcast_ref::<P>()
            .is_some_and(|p| std::ptr::eq(p, Arc::as_ptr(provider)))
    }

    /// Runs the bound handler.
    ///
    /// # Errors
    /// Whatever the handler returns.
    pub async fn invoke(&self, args: QueryArgs) -> anyhow::Result<Value> {
        (self.call)(args).await
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("key", &self.key)
            .field("provider", &self.provider_name)
            .finish_non_exhaustive()
    }
}

/// Collects provider bindings and rejects conflicting keys.
#[derive(Default)]
pub struct RegistryBuilder {
    name: Option<String>,
    bindings: HashMap<QueryKey, HandlerBinding>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the resulting registry (used in logs).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Binds a single `key` to `handler` on `provider`.
    ///
    /// # Errors
    /// [`BrokerError::InvalidKey`] for a malformed key,
    /// [`BrokerError::DuplicateKey`] if the key is already bound.
    pub fn register<P: InfoProvider>(
        &mut self,
        key: &str,
        provider: &Arc<P>,
        handler: Handler<P>,
    ) -> BrokerResult<&mut Self> {
        let key = QueryKey::parse(key)?;
        if let Some(existing) = self.bindings.get(&key) {
            return Err(BrokerError::DuplicateKey {
                key: key.to_string(),
                existing: existing.provider_name().to_owned(),
                rejected: provider.provider_name().to_owned(),
            });
        }
        tracing::debug!(
            key = %key,
            provider = provider.provider_name(),
            "registered query handler"
        );
        let binding = HandlerBinding::new(key.clone(), provider, handler);
        self.bindings.insert(key, binding);
        Ok(self)
    }

    /// Binds every key from [`InfoProvider::provides`].
    ///
    /// Registration stops at the first failing key; keys bound before it stay bound.
    ///
    /// # Errors
    /// See [`RegistryBuilder::register`].
    pub fn with_provider<P: InfoProvider>(&mut self, provider: &Arc<P>) -> BrokerResult<&mut Self> {
        for (key, handler) in P::provides().into_entries() {
            self.register(key, provider, handler)?;
        }
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> Registry {
        let name = self.name.unwrap_or_else(|| "registry".to_owned());
        tracing::info!(registry = %name, keys = self.bindings.len(), "query registry built");
        Registry {
            name,
            bindings: self.bindings,
        }
    }
}

/// Immutable `key -> handler` table.
pub struct Registry {
    name: String,
    bindings: HashMap<QueryKey, HandlerBinding>,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up the binding for `key`.
    ///
    /// # Errors
    /// [`BrokerError::UnknownKey`] if the key is not registered.
    pub fn resolve(&self, key: &str) -> BrokerResult<&HandlerBinding> {
        self.bindings
            .get(key)
            .ok_or_else(|| BrokerError::unknown_key(key))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&QueryKey> {
        let mut keys: Vec<_> = self.bindings.keys().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("keys", &self.keys())
            .finish()
    }
}

#[async_trait]
impl InfoBroker for Registry {
    fn can_answer(&self, key: &str) -> bool {
        self.contains(key)
    }

    #[tracing::instrument(skip_all, fields(registry = %self.name, key = %key))]
    async fn answer(&self, key: &str, args: QueryArgs) -> BrokerResult<Value> {
        let binding = self.resolve(key)?;
        tracing::trace!(provider = binding.provider_name(), "dispatching query");
        binding
            .invoke(args)
            .await
            .map_err(|source| BrokerError::handler(key, source))
    }
}
