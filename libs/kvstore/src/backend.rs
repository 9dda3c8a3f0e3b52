use async_trait::async_trait;
use serde_json::Value;

use crate::error::KvResult;

/// Physical storage behind a [`KeyValueStore`](crate::KeyValueStore).
///
/// Values are JSON documents; a `set` replaces the whole document under a key.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Protocol name this backend was registered under (`dict`, `redis`, ...).
    fn protocol(&self) -> &'static str;

    /// # Errors
    /// [`KvError::BackendUnavailable`](crate::KvError::BackendUnavailable) on I/O
    /// failure, [`KvError::Codec`](crate::KvError::Codec) if the stored bytes are
    /// not JSON.
    async fn get(&self, key: &str) -> KvResult<Option<Value>>;

    /// # Errors
    /// [`KvError::BackendUnavailable`](crate::KvError::BackendUnavailable) on I/O failure.
    async fn set(&self, key: &str, value: Value) -> KvResult<()>;

    /// Removes `key`, returning whether it existed.
    ///
    /// # Errors
    /// [`KvError::BackendUnavailable`](crate::KvError::BackendUnavailable) on I/O failure.
    async fn delete(&self, key: &str) -> KvResult<bool>;

    /// Physical keys matching a glob-style `pattern` (`infra:*:state`), without duplicates.
    ///
    /// # Errors
    /// [`KvError::InvalidPattern`](crate::KvError::InvalidPattern) or
    /// [`KvError::BackendUnavailable`](crate::KvError::BackendUnavailable).
    async fn scan(&self, pattern: &str) -> KvResult<Vec<String>>;
}
