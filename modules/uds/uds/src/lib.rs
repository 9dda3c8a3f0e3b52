//! UDS module
//!
//! Stores infrastructure descriptions, per-infrastructure node state, node
//! definitions and backend records in a [`kvstore::KeyValueStore`], and answers
//! the `uds_sdk::query_keys` namespace through the info broker.
//!
//! ```ignore
//! let main = MainBroker::new();
//! let service = Arc::new(UdsService::from_config(&config.uds, main.clone())?);
//! let router = InfoRouter::new("main").with(Arc::new(uds::provider::registry(&service)?));
//! main.install(Arc::new(router))?;
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod local_client;
pub mod provider;

pub use config::UdsConfig;
pub use domain::selection::{DefinitionSelector, FirstSelector, RandomSelector};
pub use domain::service::UdsService;
pub use local_client::UdsLocalClient;
