//! Query-key registry and routing.
//!
//! Components publish answers to named questions by implementing
//! [`InfoProvider`] and registering into a [`Registry`]; other components ask
//! those questions through an [`InfoBroker`], typically a [`MainBroker`] handle
//! that forwards to a top-level [`InfoRouter`] installed after assembly.

pub mod args;
pub mod broker;
pub mod error;
pub mod key;
pub mod main_broker;
pub mod provider;
pub mod registry;
pub mod router;

pub use args::{ArgsError, QueryArgs};
pub use broker::InfoBroker;
pub use error::{BrokerError, BrokerResult};
pub use key::QueryKey;
pub use main_broker::MainBroker;
pub use provider::{Handler, HandlerFuture, InfoProvider, ProvidesTable};
pub use registry::{HandlerBinding, Registry, RegistryBuilder};
pub use router::InfoRouter;
