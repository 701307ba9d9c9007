use actionrouter::action::{HandlerRegistration, ResultDescriptor};
use actionrouter::interceptor::{Interceptor, MetricsInterceptor};
use actionrouter::{ActionRouter, SharedRouter};
use serde_json::json;
use std::sync::Arc;
use std::thread;

mod common;
use common::{named_handler, register};

const THREADS: usize = 8;
const CALLS_PER_THREAD: usize = 200;

fn build_router(metrics: &Arc<MetricsInterceptor>) -> ActionRouter {
    let mut router = ActionRouter::new();
    router
        .register_shared_interceptor("metrics", Arc::clone(metrics) as Arc<dyn Interceptor>)
        .unwrap();
    router
        .register_handler(
            HandlerRegistration::new("/items/{id}", named_handler("item")).interceptor("metrics"),
        )
        .unwrap();
    router
        .register_handler(
            HandlerRegistration::new("/alias/{id}", named_handler("alias"))
                .interceptor("metrics")
                .result(ResultDescriptor::forward("success", "/items/0")),
        )
        .unwrap();
    register(&mut router, "/**", named_handler("fallback"));
    router
}

#[test]
fn test_parallel_dispatch_on_shared_router() {
    let metrics = Arc::new(MetricsInterceptor::new());
    let router = Arc::new(build_router(&metrics));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for i in 0..CALLS_PER_THREAD {
                    let id = format!("{t}-{i}");
                    let out = router.dispatch(&format!("/items/{id}"), vec![]).unwrap();
                    assert_eq!(out["params"]["id"], id.as_str());

                    let forwarded = router.dispatch(&format!("/alias/{id}"), vec![]).unwrap();
                    assert_eq!(forwarded["handler"], "item");
                    assert_eq!(forwarded["params"]["id"], "0");

                    let resolved = router.resolve("/unknown/path").unwrap();
                    assert_eq!(resolved.descriptor.path(), "/**");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Each alias call passes the metrics interceptor twice: once for itself,
    // once for the forwarded item call.
    assert_eq!(metrics.invocation_count(), THREADS * CALLS_PER_THREAD * 3);
    assert_eq!(metrics.failure_count(), 0);
    let items = metrics.pattern_stats("/items/{id}").unwrap();
    assert_eq!(
        items.invocations.load(std::sync::atomic::Ordering::Relaxed),
        THREADS * CALLS_PER_THREAD * 2
    );
}

#[test]
fn test_shared_router_snapshot_swap() {
    let mut first = ActionRouter::new();
    register(&mut first, "/version", named_handler("v1"));
    let shared = Arc::new(SharedRouter::new(first));

    let snapshot = shared.load();
    assert_eq!(shared.dispatch("/version", vec![]).unwrap()["handler"], "v1");

    let mut second = ActionRouter::new();
    register(&mut second, "/version", named_handler("v2"));
    register(&mut second, "/new", named_handler("new"));
    let previous = shared.replace(second);

    assert_eq!(previous.handlers().len(), 1);
    assert_eq!(shared.dispatch("/version", vec![]).unwrap()["handler"], "v2");
    assert_eq!(shared.dispatch("/new", vec![json!(1)]).unwrap()["args"], json!([1]));

    // Snapshots taken before the swap keep serving the old table.
    assert_eq!(snapshot.dispatch("/version", vec![]).unwrap()["handler"], "v1");
    assert!(snapshot.dispatch("/new", vec![]).unwrap_err().is_not_found());
}

#[test]
fn test_swap_while_dispatching() {
    let mut initial = ActionRouter::new();
    register(&mut initial, "/ping", named_handler("a"));
    let shared = Arc::new(SharedRouter::new(initial));

    let readers: Vec<_> = (0..THREADS)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..CALLS_PER_THREAD {
                    let out = shared.dispatch("/ping", vec![]).unwrap();
                    let name = out["handler"].as_str().unwrap().to_string();
                    assert!(name == "a" || name == "b", "unexpected handler {name}");
                }
            })
        })
        .collect();

    for round in 0..20 {
        let mut next = ActionRouter::new();
        let name = if round % 2 == 0 { "b" } else { "a" };
        register(&mut next, "/ping", named_handler(name));
        shared.replace(next);
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_router_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ActionRouter>();
    assert_send_sync::<SharedRouter>();
}
