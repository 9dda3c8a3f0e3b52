//! Backend-agnostic key/value store.
//!
//! [`KeyValueStore`] is the typed handle callers use; the physical storage is a
//! [`KvBackend`] picked at construction time by protocol name through a
//! [`BackendFactory`]. Two backends ship with the crate: an in-memory map
//! (`dict`, the default) and a Redis client (`redis`).

pub mod backend;
pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod store;

pub use backend::KvBackend;
pub use backends::{DictConfig, MemoryBackend, RedisBackend, RedisConfig};
pub use config::{KvStoreConfig, SecretString};
pub use error::{KvError, KvResult};
pub use factory::{BackendConstructor, BackendFactory};
pub use store::{KeyValueStore, cut_id};
