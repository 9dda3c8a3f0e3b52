//! Composite broker that delegates to an ordered list of sub-brokers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::args::QueryArgs;
use crate::broker::InfoBroker;
use crate::error::{BrokerError, BrokerResult};

/// Routes each query to the first sub-broker that can answer it.
///
/// A router owns no keys of its own. Sub-brokers are tried in declaration
/// order, so an earlier one shadows a later one for a shared key. Any
/// [`InfoBroker`] can be a sub-broker, including another router.
pub struct InfoRouter {
    name: String,
    sub_brokers: Vec<Arc<dyn InfoBroker>>,
}

impl InfoRouter {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_brokers: Vec::new(),
        }
    }

    /// Appends a sub-broker at the lowest priority.
    #[must_use]
    pub fn with(mut self, sub_broker: Arc<dyn InfoBroker>) -> Self {
        self.sub_brokers.push(sub_broker);
        self
    }

    pub fn push(&mut self, sub_broker: Arc<dyn InfoBroker>) {
        self.sub_brokers.push(sub_broker);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sub_brokers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sub_brokers.is_empty()
    }

    /// Position of the sub-broker that would service `key`.
    #[must_use]
    pub fn route(&self, key: &str) -> Option<usize> {
        self.sub_brokers.iter().position(|b| b.can_answer(key))
    }
}

impl fmt::Debug for InfoRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfoRouter")
            .field("name", &self.name)
            .field("sub_brokers", &self.sub_brokers.len())
            .finish()
    }
}

#[async_trait]
impl InfoBroker for InfoRouter {
    fn can_answer(&self, key: &str) -> bool {
        self.route(key).is_some()
    }

    #[tracing::instrument(skip_all, fields(router = %self.name, key = %key))]
    async fn answer(&self, key: &str, args: QueryArgs) -> BrokerResult<Value> {
        let Some(index) = self.route(key) else {
            tracing::trace!("no sub-broker answers key");
            return Err(BrokerError::unknown_key(key));
        };
        tracing::trace!(sub_broker = index, "routing query");
        self.sub_brokers[index].answer(key, args).await
    }
}
