use actionrouter::action::{HandlerRegistration, NamespaceDescriptor};
use actionrouter::runtime_config::RouterConfig;
use actionrouter::{ActionRouter, ErrorKind, RouterError};
use serde_json::json;

mod common;
use common::{named_handler, register, served_by};

fn zoo_router() -> ActionRouter {
    let mut router = ActionRouter::new();
    register(&mut router, "/", named_handler("root"));
    register(&mut router, "/zoo/animals", named_handler("list_animals"));
    register(&mut router, "/zoo/animals/new", named_handler("new_animal"));
    register(&mut router, "/zoo/animals/{id}", named_handler("get_animal"));
    register(&mut router, "/zoo/animals/{id}/feed", named_handler("feed_animal"));
    register(&mut router, "/zoo/*/map", named_handler("area_map"));
    register(&mut router, "/zoo/**", named_handler("zoo_fallback"));
    register(&mut router, "/**", named_handler("global_fallback"));
    router
}

#[test]
fn test_literal_beats_param() {
    let router = zoo_router();
    assert_eq!(served_by(&router, "/zoo/animals/new"), "new_animal");
    assert_eq!(served_by(&router, "/zoo/animals/7"), "get_animal");
}

#[test]
fn test_param_capture_reaches_handler() {
    let router = zoo_router();
    let out = router.dispatch("/zoo/animals/42/feed", vec![]).unwrap();
    assert_eq!(out["handler"], "feed_animal");
    assert_eq!(out["params"], json!({ "id": "42" }));
}

#[test]
fn test_single_wildcard_and_catch_all_fallbacks() {
    let router = zoo_router();
    assert_eq!(served_by(&router, "/zoo/north/map"), "area_map");
    assert_eq!(served_by(&router, "/zoo/north/south/map"), "zoo_fallback");
    assert_eq!(served_by(&router, "/zoo"), "zoo_fallback");
    assert_eq!(served_by(&router, "/aquarium/tank/1"), "global_fallback");
    assert_eq!(served_by(&router, "/"), "root");
}

#[test]
fn test_resolve_normalizes_input() {
    let router = zoo_router();
    let m = router.resolve("//zoo//animals/9/").unwrap();
    assert_eq!(m.descriptor.path(), "/zoo/animals/{id}");
    assert_eq!(m.get_path_param("id"), Some("9"));
}

#[test]
fn test_not_found_without_catch_all() {
    let mut router = ActionRouter::new();
    register(&mut router, "/a/{x}", named_handler("a"));
    assert!(router.resolve("/a").is_none());
    assert!(router.resolve("/a/b/c").is_none());

    let err = router.dispatch("/b", vec![]).unwrap_err();
    assert!(matches!(err, RouterError::NotFound { ref path } if path == "/b"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_duplicate_shape_rejected() {
    let mut router = ActionRouter::new();
    register(&mut router, "/users/{id}", named_handler("first"));

    let err = router
        .register_handler(HandlerRegistration::new(
            "users/{user_id}/",
            named_handler("second"),
        ))
        .unwrap_err();
    assert!(matches!(err, RouterError::DuplicatePath { .. }));
    assert_eq!(err.kind(), ErrorKind::Misconfiguration);
    assert_eq!(served_by(&router, "/users/1"), "first");
}

#[test]
fn test_invalid_patterns_rejected() {
    let mut router = ActionRouter::new();
    for bad in ["/a/**/b", "/a/{}", "/a/{1x}"] {
        let err = router
            .register_handler(HandlerRegistration::new(bad, named_handler("bad")))
            .unwrap_err();
        assert!(
            matches!(err, RouterError::InvalidPattern { .. }),
            "{bad} should be rejected, got {err:?}"
        );
    }
    assert!(router.handlers().is_empty());
}

#[test]
fn test_namespace_prefixes_pattern() {
    let mut router = ActionRouter::new();
    router
        .register_namespace(NamespaceDescriptor::new("admin", "/admin/"))
        .unwrap();
    let descriptor = router
        .register_handler(
            HandlerRegistration::new("/users/{id}", named_handler("admin_user")).namespace("admin"),
        )
        .unwrap();

    assert_eq!(descriptor.path(), "/admin/users/{id}");
    assert_eq!(descriptor.namespace(), Some("admin"));
    assert_eq!(served_by(&router, "/admin/users/3"), "admin_user");
    assert!(router.resolve("/users/3").is_none());
}

#[test]
fn test_unknown_namespace_rejected() {
    let mut router = ActionRouter::new();
    let err = router
        .register_handler(HandlerRegistration::new("/x", named_handler("x")).namespace("ghost"))
        .unwrap_err();
    assert!(matches!(
        err,
        RouterError::UnknownReference { kind: "namespace", ref name } if name == "ghost"
    ));
}

#[test]
fn test_duplicate_namespace_rejected() {
    let mut router = ActionRouter::new();
    router
        .register_namespace(NamespaceDescriptor::new("api", "/api"))
        .unwrap();
    let err = router
        .register_namespace(NamespaceDescriptor::new("api", "/v2"))
        .unwrap_err();
    assert!(matches!(err, RouterError::DuplicateName { kind: "namespace", .. }));
    assert_eq!(router.namespace("api").unwrap().prefix, "/api");
}

#[test]
fn test_custom_separator_router() {
    let mut router = ActionRouter::with_config(RouterConfig::default().with_separator('.'));
    register(&mut router, "orders.{id}.cancel", named_handler("cancel"));
    register(&mut router, "orders.**", named_handler("orders"));

    let out = router.dispatch("orders.17.cancel", vec![]).unwrap();
    assert_eq!(out["handler"], "cancel");
    assert_eq!(out["params"]["id"], "17");
    assert_eq!(served_by(&router, "orders.17.refund"), "orders");
}

#[test]
fn test_clear_removes_everything() {
    let mut router = zoo_router();
    assert_eq!(router.handlers().len(), 8);

    router.clear();
    assert!(router.handlers().is_empty());
    assert!(router.resolve("/zoo/animals").is_none());

    router.clear();
    register(&mut router, "/zoo/animals", named_handler("again"));
    assert_eq!(served_by(&router, "/zoo/animals"), "again");
}
