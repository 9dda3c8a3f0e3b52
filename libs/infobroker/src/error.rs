//! Errors surfaced by registries, routers and the main broker handle.

use thiserror::Error;

/// Errors returned by an [`InfoBroker`](crate::InfoBroker).
#[derive(Error, Debug)]
pub enum BrokerError {
    /// No provider in reach answers this key.
    #[error("Unknown query key: '{key}'")]
    UnknownKey { key: String },

    /// Two providers tried to claim the same key in one registry.
    #[error("Query key '{key}' is already provided by '{existing}', rejected registration by '{rejected}'")]
    DuplicateKey {
        key: String,
        existing: String,
        rejected: String,
    },

    /// The main broker has been queried before one was installed.
    #[error("Main info broker is not installed")]
    NotReady,

    /// `install` was called while a main broker was already set.
    #[error("Main info broker is already installed")]
    AlreadyInstalled,

    /// A key failed syntax validation.
    #[error("Invalid query key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// The handler bound to `key` failed. The original failure is kept as the source.
    #[error("Query '{key}' failed")]
    Handler {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// The answer could not be decoded into the requested type.
    #[error("Cannot decode answer to '{key}'")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BrokerError {
    #[must_use]
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }

    #[must_use]
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn handler(key: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Handler {
            key: key.into(),
            source,
        }
    }

    /// Returns `true` for [`BrokerError::UnknownKey`].
    #[must_use]
    pub fn is_unknown_key(&self) -> bool {
        matches!(self, Self::UnknownKey { .. })
    }

    /// Looks through a [`BrokerError::Handler`] for a handler failure of type `E`.
    ///
    /// Returns `None` for other variants or when the cause is of a different type.
    #[must_use]
    pub fn handler_cause<E>(&self) -> Option<&E>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Self::Handler { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

pub type BrokerResult<T> = Result<T, BrokerError>;
