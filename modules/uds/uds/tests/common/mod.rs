#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for uds integration tests

use std::sync::Arc;

use infobroker::{
    HandlerFuture, InfoProvider, InfoRouter, MainBroker, ProvidesTable, QueryArgs, Registry,
};
use kvstore::{KeyValueStore, MemoryBackend};
use serde_json::json;
use uds::{UdsLocalClient, UdsService};
use uds_sdk::query_keys;

/// Everything a test needs, wired the way an application assembles it.
pub struct Harness {
    pub main: MainBroker,
    pub service: Arc<UdsService>,
    pub client: UdsLocalClient,
}

/// UDS alone under the main router; nobody answers `node.state`.
pub fn create_service() -> Harness {
    assemble(None)
}

/// UDS plus a provider answering `node.state` with `state` for every node.
pub fn create_service_with_state(state: &'static str) -> Harness {
    assemble(Some(Arc::new(NodeStateStub { state })))
}

fn assemble(state_provider: Option<Arc<NodeStateStub>>) -> Harness {
    let main = MainBroker::new();
    let kv = KeyValueStore::new(Arc::new(MemoryBackend::new()));
    let service = Arc::new(UdsService::new(kv, main.clone()));

    let mut router = InfoRouter::new("main").with(Arc::new(uds::provider::registry(&service).unwrap()));
    if let Some(stub) = state_provider {
        let mut builder = Registry::builder().named("node-state");
        builder.with_provider(&stub).unwrap();
        router.push(Arc::new(builder.build()));
    }
    main.install(Arc::new(router)).unwrap();

    let client = UdsLocalClient::new(Arc::clone(&service));
    Harness {
        main,
        service,
        client,
    }
}

/// Answers `node.state`, echoing the node id it was asked about.
pub struct NodeStateStub {
    state: &'static str,
}

impl InfoProvider for NodeStateStub {
    fn provider_name(&self) -> &str {
        "node-state-stub"
    }

    fn provides() -> ProvidesTable<Self> {
        ProvidesTable::new().provides(query_keys::NODE_STATE, Self::node_state)
    }
}

impl NodeStateStub {
    fn node_state(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let instance: serde_json::Value = args.required(query_keys::args::INSTANCE_DATA)?;
            let node_id = instance["node_id"].as_str().unwrap_or_default().to_owned();
            Ok(json!(format!("{}:{node_id}", self.state)))
        })
    }
}
