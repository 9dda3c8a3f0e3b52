use infobroker::BrokerError;
use kvstore::KvError;
use thiserror::Error;

/// Errors returned by UDS operations.
#[derive(Error, Debug)]
pub enum UdsError {
    /// No record under the physical key.
    #[error("Record not found: '{key}'")]
    NotFound { key: String },

    /// The node type has no candidate definitions at all.
    #[error("No node definitions for node type '{node_type}'")]
    NoDefinitions { node_type: String },

    /// None of the candidates belongs to the requested backend.
    #[error("No definition of node type '{node_type}' for backend '{backend_id}'")]
    NoMatchingDefinition {
        node_type: String,
        backend_id: String,
    },

    /// The key/value backend failed.
    #[error("Storage error")]
    Storage(#[source] KvError),

    /// A query delegated through the main broker failed.
    #[error("Broker error")]
    Broker(#[from] BrokerError),

    /// A stored or supplied record is malformed.
    #[error("Invalid record '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },
}

impl UdsError {
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    #[must_use]
    pub fn invalid_record(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            key: key.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Transient backend failure; retrying is up to the caller.
    #[must_use]
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_backend_unavailable())
    }
}

impl From<KvError> for UdsError {
    fn from(e: KvError) -> Self {
        match e {
            KvError::NotFound { key } => Self::NotFound { key },
            KvError::Codec { key, source } => Self::InvalidRecord {
                key,
                reason: source.to_string(),
            },
            other => Self::Storage(other),
        }
    }
}
