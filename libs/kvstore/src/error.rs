use thiserror::Error;

/// Errors returned by key/value backends and the [`KeyValueStore`](crate::KeyValueStore) handle.
#[derive(Error, Debug)]
pub enum KvError {
    /// No record under `key` and no default was supplied.
    #[error("Key not found: '{key}'")]
    NotFound { key: String },

    /// The backend could not be reached or did not answer in time.
    #[error("Backend '{backend}' unavailable")]
    BackendUnavailable {
        backend: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// No backend is registered for the configured protocol.
    #[error("Unknown key/value store protocol '{protocol}'")]
    UnknownProtocol { protocol: String },

    /// Backend options failed validation.
    #[error("Invalid configuration for '{protocol}' backend")]
    InvalidConfig {
        protocol: String,
        #[source]
        source: serde_json::Error,
    },

    /// A scan pattern could not be compiled.
    #[error("Invalid key pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A stored value could not be encoded or decoded.
    #[error("Cannot encode/decode value for '{key}'")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl KvError {
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    #[must_use]
    pub fn unavailable(backend: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::BackendUnavailable {
            backend,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn codec(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Codec {
            key: key.into(),
            source,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

pub type KvResult<T> = Result<T, KvError>;
