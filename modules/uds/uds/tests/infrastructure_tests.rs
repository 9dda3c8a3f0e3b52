#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use serde_json::json;
use uds_sdk::{InstanceRecord, StaticDescription, UdsApi};

fn demo_description() -> StaticDescription {
    StaticDescription::new("i1", "demo")
        .with_field("nodes", json!([{"name": "web", "type": "web"}, {"name": "db", "type": "db"}]))
        .with_field("dependencies", json!([["web", "db"]]))
}

#[tokio::test]
async fn description_round_trip() {
    let h = common::create_service();
    let desc = demo_description();

    h.client.add_infrastructure(&desc).await.unwrap();

    assert_eq!(h.client.get_static_description("i1").await.unwrap(), desc);
    assert_eq!(h.client.get_infrastructure_name("i1").await.unwrap(), "demo");
}

#[tokio::test]
async fn add_infrastructure_overwrites() {
    let h = common::create_service();
    h.client.add_infrastructure(&demo_description()).await.unwrap();

    let renamed = StaticDescription::new("i1", "renamed");
    h.client.add_infrastructure(&renamed).await.unwrap();
    assert_eq!(h.client.get_static_description("i1").await.unwrap(), renamed);
}

#[tokio::test]
async fn undeclared_infrastructure_is_not_found() {
    let h = common::create_service();
    let err = h.client.get_static_description("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(h.client.get_infrastructure_name("missing").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn dynamic_state_of_fresh_infrastructure_is_empty() {
    let h = common::create_service();
    h.client.add_infrastructure(&demo_description()).await.unwrap();

    let state = h.client.get_dynamic_state("i1").await.unwrap();
    assert!(state.is_empty());
}

#[tokio::test]
async fn remove_infrastructure_deletes_description() {
    let h = common::create_service();
    h.client.add_infrastructure(&demo_description()).await.unwrap();

    assert!(h.client.remove_infrastructure("i1").await.unwrap());
    assert!(!h.client.remove_infrastructure("i1").await.unwrap());
    assert!(h.client.get_static_description("i1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn register_started_node_is_idempotent_per_node_id() {
    let h = common::create_service();
    let rec = InstanceRecord::new("n1").with_attribute("ip", "10.0.0.1");

    h.client.register_started_node("i1", "web", rec.clone()).await.unwrap();
    h.client.register_started_node("i1", "web", rec).await.unwrap();

    let state = h.client.get_dynamic_state("i1").await.unwrap();
    assert_eq!(state.instance_count(), 1);
    assert_eq!(state.instances("web").unwrap().len(), 1);
    assert_eq!(state.get("web", "n1").unwrap().attributes["ip"], json!("10.0.0.1"));
}

#[tokio::test]
async fn remove_node_drops_the_entry() {
    let h = common::create_service();
    h.client
        .register_started_node("i1", "web", InstanceRecord::new("n1"))
        .await
        .unwrap();
    h.client
        .register_started_node("i1", "web", InstanceRecord::new("n2"))
        .await
        .unwrap();
    h.client
        .register_started_node("i1", "db", InstanceRecord::new("n3"))
        .await
        .unwrap();

    assert!(h.client.remove_node("i1", "web", "n1").await.unwrap());
    assert!(!h.client.remove_node("i1", "web", "n1").await.unwrap());
    assert!(h.client.remove_node("i1", "db", "n3").await.unwrap());

    let state = h.client.get_dynamic_state("i1").await.unwrap();
    assert!(state.get("web", "n1").is_none());
    assert!(state.get("web", "n2").is_some());
    assert!(state.instances("db").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_lose_no_updates() {
    const N: usize = 64;
    let h = common::create_service();

    let tasks: Vec<_> = (0..N)
        .map(|i| {
            let service = std::sync::Arc::clone(&h.service);
            tokio::spawn(async move {
                service
                    .register_started_node("i1", "web", InstanceRecord::new(format!("n{i}")))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let state = h.client.get_dynamic_state("i1").await.unwrap();
    assert_eq!(state.instance_count(), N);
    for i in 0..N {
        assert!(state.get("web", &format!("n{i}")).is_some(), "n{i} was lost");
    }
}
