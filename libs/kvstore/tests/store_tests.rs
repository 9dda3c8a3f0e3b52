#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::{Duration, Instant};

use kvstore::{KeyValueStore, KvError, KvStoreConfig, cut_id};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Target {
    endpoint: String,
}

fn dict_store() -> KeyValueStore {
    KeyValueStore::from_config(&KvStoreConfig::default()).unwrap()
}

#[tokio::test]
async fn get_falls_back_to_default_only_when_absent() {
    let store = dict_store();
    assert_eq!(store.protocol(), "dict");

    let err = store.get::<Target>("backend:ec2").await.unwrap_err();
    assert!(err.is_not_found());

    let fallback = store
        .get_or("backend:ec2", json!({}))
        .await
        .unwrap();
    assert_eq!(fallback, json!({}));

    let target = Target {
        endpoint: "https://ec2.example".to_owned(),
    };
    store.set("backend:ec2", &target).await.unwrap();
    assert_eq!(store.get::<Target>("backend:ec2").await.unwrap(), target);
    assert_eq!(
        store
            .get_or(
                "backend:ec2",
                Target {
                    endpoint: String::new()
                }
            )
            .await
            .unwrap(),
        target
    );
}

#[tokio::test]
async fn decode_mismatch_is_a_codec_error() {
    let store = dict_store();
    store.set("backend:ec2", &json!([1, 2, 3])).await.unwrap();
    let err = store.get::<Target>("backend:ec2").await.unwrap_err();
    assert!(matches!(err, KvError::Codec { .. }));
}

#[tokio::test]
async fn enumerate_extracts_infrastructure_ids() {
    let store = dict_store();
    for id in ["x", "y", "z"] {
        store
            .set(&format!("infra:{id}:state"), &json!({}))
            .await
            .unwrap();
    }
    store.set("infra:x:description", &json!({})).await.unwrap();
    store.set("backend:ec2", &json!({})).await.unwrap();

    let mut ids = store
        .enumerate("infra:*:state", |k| cut_id(k).to_owned())
        .await
        .unwrap();
    ids.sort();
    assert_eq!(ids, vec!["x", "y", "z"]);

    let backends = store
        .enumerate("backend:*", |k| cut_id(k).to_owned())
        .await
        .unwrap();
    assert_eq!(backends, vec!["backend"]);
}

#[tokio::test]
async fn seeded_dict_store() {
    let config = KvStoreConfig::dict().option(
        "init_data",
        json!({"backend:ec2": {"endpoint": "https://ec2.example"}}),
    );
    let store = KeyValueStore::from_config(&config).unwrap();
    let target: Target = store.get("backend:ec2").await.unwrap();
    assert_eq!(target.endpoint, "https://ec2.example");
    assert!(store.delete("backend:ec2").await.unwrap());
    assert!(store.get::<Target>("backend:ec2").await.unwrap_err().is_not_found());
}

#[test]
fn factory_rejects_bad_configuration() {
    let err = KeyValueStore::from_config(&KvStoreConfig::with_protocol("etcd")).unwrap_err();
    assert!(matches!(err, KvError::UnknownProtocol { ref protocol } if protocol == "etcd"));

    let err = KeyValueStore::from_config(&KvStoreConfig::dict().option("bogus", 1)).unwrap_err();
    assert!(matches!(err, KvError::InvalidConfig { .. }));

    let err = KeyValueStore::from_config(
        &KvStoreConfig::with_protocol("redis").option("port", "not-a-port"),
    )
    .unwrap_err();
    assert!(matches!(err, KvError::InvalidConfig { .. }));
}

#[tokio::test]
async fn redis_on_closed_port_is_unavailable() {
    // Port 1 on loopback is not expected to accept connections.
    let config = KvStoreConfig::with_protocol("redis")
        .option("host", "127.0.0.1")
        .option("port", 1)
        .option("request_timeout", "300ms");
    let store = KeyValueStore::from_config(&config).unwrap();
    assert_eq!(store.protocol(), "redis");

    let started = Instant::now();
    let err = store.get::<Target>("backend:ec2").await.unwrap_err();
    assert!(err.is_backend_unavailable(), "unexpected error: {err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));

    let err = store.set("backend:ec2", &json!({})).await.unwrap_err();
    assert!(err.is_backend_unavailable());
}
