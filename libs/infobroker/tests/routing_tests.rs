#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end routing: providers -> registries -> router -> main broker.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use infobroker::{
    BrokerError, HandlerFuture, InfoBroker, InfoProvider, InfoRouter, MainBroker, ProvidesTable,
    QueryArgs, Registry,
};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
#[error("backend '{0}' refused the request")]
struct Refused(String);

struct Alpha {
    calls: AtomicUsize,
}

impl InfoProvider for Alpha {
    fn provider_name(&self) -> &str {
        "alpha"
    }

    fn provides() -> ProvidesTable<Self> {
        ProvidesTable::new()
            .provides("a", Self::answer_a)
            .provides("alpha.fail", Self::fail)
    }
}

impl Alpha {
    fn answer_a(self: Arc<Self>, _args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!("from alpha"))
        })
    }

    fn fail(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let backend: String = args.required("backend")?;
            Err(Refused(backend).into())
        })
    }
}

struct Beta;

impl InfoProvider for Beta {
    fn provider_name(&self) -> &str {
        "beta"
    }

    fn provides() -> ProvidesTable<Self> {
        ProvidesTable::new().provides("b", Self::answer_b)
    }
}

impl Beta {
    fn answer_b(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let n: Option<i64> = args.optional("n")?;
            Ok(json!({ "from": "beta", "n": n }))
        })
    }
}

fn registry_of<P: InfoProvider>(provider: &Arc<P>) -> Arc<Registry> {
    let mut builder = Registry::builder().named(provider.provider_name().to_owned());
    builder.with_provider(provider).unwrap();
    Arc::new(builder.build())
}

fn router(alpha: &Arc<Alpha>) -> InfoRouter {
    InfoRouter::new("main")
        .with(registry_of(alpha))
        .with(registry_of(&Arc::new(Beta)))
}

#[tokio::test]
async fn router_resolves_each_key_to_its_owner() {
    let alpha = Arc::new(Alpha {
        calls: AtomicUsize::new(0),
    });
    let router = router(&alpha);

    // Order of queries does not matter.
    let b = router.answer("b", QueryArgs::new().with("n", 7)).await.unwrap();
    let a = router.answer("a", QueryArgs::new()).await.unwrap();
    let b_again = router.answer("b", QueryArgs::new()).await.unwrap();

    assert_eq!(a, json!("from alpha"));
    assert_eq!(b, json!({"from": "beta", "n": 7}));
    assert_eq!(b_again, json!({"from": "beta", "n": Value::Null}));
    assert_eq!(alpha.calls.load(Ordering::SeqCst), 1);

    let err = router.answer("c", QueryArgs::new()).await.unwrap_err();
    assert!(matches!(err, BrokerError::UnknownKey { ref key } if key == "c"));
}

#[test]
fn duplicate_registration_fails_at_startup() {
    let alpha = Arc::new(Alpha {
        calls: AtomicUsize::new(0),
    });
    let mut builder = Registry::builder();
    builder.with_provider(&alpha).unwrap();
    let err = builder.register("a", &Arc::new(Beta), Beta::answer_b).err().unwrap();
    assert!(matches!(err, BrokerError::DuplicateKey { .. }));
    assert!(err.to_string().contains("alpha"));
}

#[tokio::test]
async fn handler_failure_keeps_its_cause_through_the_router() {
    let alpha = Arc::new(Alpha {
        calls: AtomicUsize::new(0),
    });
    let outer = InfoRouter::new("outer").with(Arc::new(router(&alpha)));

    let err = outer
        .answer("alpha.fail", QueryArgs::new().with("backend", "ec2"))
        .await
        .unwrap_err();

    let BrokerError::Handler { ref key, .. } = err else {
        panic!("expected handler error, got {err:?}");
    };
    assert_eq!(key, "alpha.fail");
    let cause = err.handler_cause::<Refused>().expect("original cause");
    assert_eq!(cause.0, "ec2");

    let missing = outer
        .answer("alpha.fail", QueryArgs::new())
        .await
        .unwrap_err();
    assert!(missing.handler_cause::<infobroker::ArgsError>().is_some());
}

#[tokio::test]
async fn main_broker_late_binding() {
    let main = MainBroker::new();
    let held_by_component = main.clone();

    let err = held_by_component
        .answer("a", QueryArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BrokerError::NotReady));

    let alpha = Arc::new(Alpha {
        calls: AtomicUsize::new(0),
    });
    main.install(Arc::new(router(&alpha))).unwrap();

    let answer: String = held_by_component
        .answer_as("a", QueryArgs::new())
        .await
        .unwrap();
    assert_eq!(answer, "from alpha");

    let decode = held_by_component
        .answer_as::<u32>("a", QueryArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(decode, BrokerError::Decode { .. }));

    let again = main.install(Arc::new(InfoRouter::new("other")));
    assert!(matches!(again, Err(BrokerError::AlreadyInstalled)));
}
