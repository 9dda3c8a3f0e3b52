//! UDS SDK
//!
//! Public surface of the `uds` module:
//! - `UdsApi` trait for in-process callers
//! - domain records (`StaticDescription`, `DynamicState`, `NodeDefinition`, ...)
//! - `query_keys`, the key namespace UDS answers through the info broker
//! - `UdsError`
//!
//! ## Usage
//!
//! ```ignore
//! use uds_sdk::{NodeQuery, UdsApi};
//!
//! let nodes = client.find_nodes(NodeQuery::all().named("web")).await?;
//! let definition = client.select_node_definition("web", Some("ec2")).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod error;
pub mod models;
pub mod query_keys;

pub use api::UdsApi;
pub use error::UdsError;
pub use models::{
    AuthRecord, BackendTarget, DynamicState, InstanceRecord, NodeDefinition, NodeQuery,
    ServiceComposerRecord, StaticDescription,
};
