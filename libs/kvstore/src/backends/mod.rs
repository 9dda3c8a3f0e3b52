//! Built-in backends.

pub mod memory;
pub mod redis;

pub use self::memory::{DictConfig, MemoryBackend};
pub use self::redis::{RedisBackend, RedisConfig};
