use actionrouter::action::{
    Handler, HandlerTarget, Lifecycle, ObjectCatalog, ObjectFactory, Outcome,
};
use actionrouter::dispatcher::InvocationContext;
use actionrouter::manifest::{load_manifest, parse_manifest, ManifestFormat};
use actionrouter::ActionRouter;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const YAML_MANIFEST: &str = r#"
settings:
  default_stack: basic
interceptors:
  - { name: trace, type: tracing }
  - { name: stats, type: metrics }
stacks:
  - { name: basic, interceptors: [trace] }
  - { name: admin_only, interceptors: [stats], include: ["/admin/**"] }
aop:
  - { matches: "/users/*", operation: add_after, interceptors: [stats] }
namespaces:
  - { name: admin, prefix: /admin }
global_results:
  - { name: login, type: forward, location: /login }
  - { name: success, type: none }
templates:
  user: "user {{ params.id }}: {{ value.name }}"
actions:
  - path: /users/{id}
    handler: users.show
    lifecycle: per_call
    params:
      - { name: id, kind: integer }
    results:
      - { name: success, type: render, location: user }
  - path: /panel
    namespace: admin
    handler: echo
    interceptors: [trace]
  - path: /login
    handler: echo
    results:
      - { name: success, type: none }
"#;

struct ShowUser;

impl Handler for ShowUser {
    fn handle(&self, _ctx: &InvocationContext<'_>, args: Vec<Value>) -> anyhow::Result<Outcome> {
        let id = args.first().and_then(Value::as_i64).unwrap_or_default();
        Ok(Outcome::new(json!({ "name": format!("user-{}", id * 10) })))
    }
}

fn catalog(created: &Arc<AtomicUsize>) -> Arc<dyn ObjectFactory> {
    let created = Arc::clone(created);
    let mut catalog = ObjectCatalog::new().with_echo_fallback().with_builtin_interceptors();
    catalog.handler("users.show", move || {
        created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ShowUser) as Box<dyn Handler>)
    });
    Arc::new(catalog)
}

fn chain_names(router: &ActionRouter, path: &str) -> Vec<String> {
    let matched = router.resolve(path).unwrap();
    router
        .chain_for(&matched.descriptor)
        .unwrap()
        .iter()
        .map(|i| i.name().to_string())
        .collect()
}

#[test]
fn test_yaml_manifest_builds_router() {
    let manifest = parse_manifest(YAML_MANIFEST, ManifestFormat::Yaml).unwrap();
    assert_eq!(manifest.actions.len(), 3);
    assert_eq!(manifest.actions[0].lifecycle, Lifecycle::PerCall);
    assert_eq!(manifest.actions[1].interceptors.interceptors, vec!["trace"]);

    let created = Arc::new(AtomicUsize::new(0));
    let router = manifest.into_router(catalog(&created)).unwrap();

    assert_eq!(router.config().default_stack.as_deref(), Some("basic"));
    assert_eq!(router.handlers().len(), 3);
    assert_eq!(chain_names(&router, "/users/1"), vec!["trace", "stats"]);
    assert_eq!(
        chain_names(&router, "/admin/panel"),
        vec!["trace", "trace", "stats"]
    );
    assert_eq!(chain_names(&router, "/login"), vec!["trace"]);
}

#[test]
fn test_manifest_dispatch_per_call_and_render() {
    let created = Arc::new(AtomicUsize::new(0));
    let router = parse_manifest(YAML_MANIFEST, ManifestFormat::Yaml)
        .unwrap()
        .into_router(catalog(&created))
        .unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 0);

    assert_eq!(
        router.dispatch("/users/4", vec![]).unwrap(),
        json!("user 4: user-40")
    );
    router.dispatch("/users/5", vec![]).unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 2);
}

#[test]
fn test_manifest_echo_fallback_and_namespace() {
    let created = Arc::new(AtomicUsize::new(0));
    let router = parse_manifest(YAML_MANIFEST, ManifestFormat::Yaml)
        .unwrap()
        .into_router(catalog(&created))
        .unwrap();

    let out = router.dispatch("/admin/panel", vec![json!(1)]).unwrap();
    assert_eq!(out["pattern"], "/admin/panel");
    assert_eq!(out["args"], json!([1]));
}

#[test]
fn test_json_manifest_from_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    let doc = json!({
        "actions": [
            { "path": "/ping", "handler": "pong" },
            { "path": "/old", "handler": "pong",
              "results": [{ "name": "success", "type": "forward", "location": "/ping" }] }
        ]
    });
    file.write_all(doc.to_string().as_bytes()).unwrap();

    let mut catalog = ObjectCatalog::new();
    catalog.handler("pong", || {
        Ok(Box::new(PongHandler) as Box<dyn Handler>)
    });
    let router = load_manifest(file.path())
        .unwrap()
        .into_router(Arc::new(catalog))
        .unwrap();

    assert_eq!(router.dispatch("/ping", vec![]).unwrap(), json!("pong"));
    assert_eq!(router.dispatch("/old", vec![]).unwrap(), json!("pong"));
}

struct PongHandler;

impl Handler for PongHandler {
    fn handle(&self, _ctx: &InvocationContext<'_>, _args: Vec<Value>) -> anyhow::Result<Outcome> {
        Ok(Outcome::new(json!("pong")))
    }
}

#[test]
fn test_apply_onto_existing_router() {
    let mut router = ActionRouter::new();
    router
        .register_handler(actionrouter::action::HandlerRegistration::new(
            "/existing",
            HandlerTarget::from_fn(|_, _| Ok(Outcome::new(json!("kept")))),
        ))
        .unwrap();

    let manifest = parse_manifest(
        "actions:\n  - { path: /added, handler: anything }\n",
        ManifestFormat::Yaml,
    )
    .unwrap();
    let factory: Arc<dyn ObjectFactory> = Arc::new(ObjectCatalog::new().with_echo_fallback());
    assert_eq!(manifest.apply(&mut router, factory).unwrap(), 1);

    assert_eq!(router.dispatch("/existing", vec![]).unwrap(), json!("kept"));
    assert_eq!(router.dispatch("/added", vec![]).unwrap()["pattern"], "/added");
}

#[test]
fn test_unknown_handler_type_fails_without_fallback() {
    let manifest = parse_manifest(
        "actions:\n  - { path: /x, handler: missing.type }\n",
        ManifestFormat::Yaml,
    )
    .unwrap();
    let err = manifest
        .into_router(Arc::new(ObjectCatalog::new()))
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("action '/x'"), "{chain}");
    assert!(chain.contains("missing.type"), "{chain}");
}

#[test]
fn test_stack_referencing_unknown_interceptor_fails() {
    let manifest = parse_manifest(
        "stacks:\n  - { name: s, interceptors: [nope] }\n",
        ManifestFormat::Yaml,
    )
    .unwrap();
    let err = manifest
        .into_router(Arc::new(ObjectCatalog::new()))
        .unwrap_err();
    assert!(format!("{err:#}").contains("stack 's'"));
}

#[test]
fn test_missing_manifest_file() {
    let err = load_manifest("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read manifest"));
}

#[test]
fn test_malformed_manifest() {
    assert!(parse_manifest("actions: [ { path: 1 } ]", ManifestFormat::Yaml).is_err());
    assert!(parse_manifest("{ not json", ManifestFormat::Json).is_err());
}
