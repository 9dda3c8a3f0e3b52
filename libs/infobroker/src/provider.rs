//! Providers: components that declare which query keys they answer.
//!
//! A provider lists its keys once, in [`InfoProvider::provides`], as a table of
//! `key -> handler` pairs. Handlers are plain function pointers taking the
//! provider by `Arc`, so a registry can own type-erased bindings without
//! reflection:
//!
//! ```ignore
//! impl InfoProvider for Greeter {
//!     fn provider_name(&self) -> &str { "greeter" }
//!     fn provides() -> ProvidesTable<Self> {
//!         ProvidesTable::new().provides("greeting.hello", Self::hello)
//!     }
//! }
//!
//! impl Greeter {
//!     fn hello(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
//!         Box::pin(async move { Ok(json!(format!("hello {}", args.required::<String>("who")?))) })
//!     }
//! }
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::args::QueryArgs;

/// Future returned by a query handler.
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<Value>>;

/// A query handler bound to a provider of type `P`.
pub type Handler<P> = fn(Arc<P>, QueryArgs) -> HandlerFuture;

/// A component that answers a fixed set of query keys.
pub trait InfoProvider: Send + Sync + 'static {
    /// Name used in logs and duplicate-key diagnostics.
    fn provider_name(&self) -> &str;

    /// The keys this provider answers, with the handler for each.
    fn provides() -> ProvidesTable<Self>
    where
        Self: Sized;
}

/// Declarative `key -> handler` table produced by [`InfoProvider::provides`].
pub struct ProvidesTable<P> {
    entries: Vec<(&'static str, Handler<P>)>,
}

impl<P> ProvidesTable<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declares that `handler` answers `key`.
    #[must_use]
    pub fn provides(mut self, key: &'static str, handler: Handler<P>) -> Self {
        self.entries.push((key, handler));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub(crate) fn into_entries(self) -> Vec<(&'static str, Handler<P>)> {
        self.entries
    }
}

impl<P> Default for ProvidesTable<P> {
    fn default() -> Self {
        Self::new()
    }
}
