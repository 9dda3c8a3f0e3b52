//! Late-bound handle to "the" broker of a process.
//!
//! Components receive a [`MainBroker`] at construction time and keep it.
//! The concrete broker (usually the top-level [`InfoRouter`](crate::InfoRouter))
//! is installed once assembly is complete; every clone of the handle observes
//! the installation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::args::QueryArgs;
use crate::broker::InfoBroker;
use crate::error::{BrokerError, BrokerResult};

type Slot = Arc<RwLock<Option<Arc<dyn InfoBroker>>>>;

/// Shared slot holding the installed broker.
#[derive(Clone, Default)]
pub struct MainBroker {
    slot: Slot,
}

impl MainBroker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `broker` into an empty slot.
    ///
    /// # Errors
    /// [`BrokerError::AlreadyInstalled`] if a broker is already installed.
    pub fn install(&self, broker: Arc<dyn InfoBroker>) -> BrokerResult<()> {
        let mut slot = self.slot.write();
        if slot.is_some() {
            return Err(BrokerError::AlreadyInstalled);
        }
        *slot = Some(broker);
        tracing::info!("main info broker installed");
        Ok(())
    }

    /// Swaps the installed broker, returning the previous one.
    ///
    /// Meant for tests and explicit reconfiguration; callers must not race this with queries.
    pub fn replace(&self, broker: Arc<dyn InfoBroker>) -> Option<Arc<dyn InfoBroker>> {
        let previous = self.slot.write().replace(broker);
        tracing::info!(replaced = previous.is_some(), "main info broker replaced");
        previous
    }

    /// Empties the slot, returning what was installed.
    pub fn uninstall(&self) -> Option<Arc<dyn InfoBroker>> {
        self.slot.write().take()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.slot.read().is_some()
    }

    /// The currently installed broker.
    ///
    /// # Errors
    /// [`BrokerError::NotReady`] before installation.
    pub fn current(&self) -> BrokerResult<Arc<dyn InfoBroker>> {
        self.slot.read().clone().ok_or(BrokerError::NotReady)
    }

    /// Answers `key` and decodes the result into `T`.
    ///
    /// # Errors
    /// Any error of [`InfoBroker::answer`], or [`BrokerError::Decode`] if the
    /// answer does not have the shape of `T`.
    pub async fn answer_as<T: DeserializeOwned>(
        &self,
        key: &str,
        args: QueryArgs,
    ) -> BrokerResult<T> {
        let value = self.answer(key, args).await?;
        serde_json::from_value(value).map_err(|source| BrokerError::Decode {
            key: key.to_owned(),
            source,
        })
    }
}

impl fmt::Debug for MainBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainBroker")
            .field("installed", &self.is_installed())
            .finish()
    }
}

#[async_trait]
impl InfoBroker for MainBroker {
    fn can_answer(&self, key: &str) -> bool {
        self.slot.read().as_ref().is_some_and(|b| b.can_answer(key))
    }

    async fn answer(&self, key: &str, args: QueryArgs) -> BrokerResult<Value> {
        let broker = self.current()?;
        broker.answer(key, args).await
    }
}
