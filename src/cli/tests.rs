//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use clap::Parser;
use std::io::Write;

const MANIFEST: &str = r#"
interceptors:
  - { name: trace, type: tracing }
stacks:
  - { name: basic, interceptors: [trace] }
actions:
  - path: /users/{id}
    handler: users.show
    stack: basic
  - path: /old
    handler: legacy
    results:
      - { name: success, type: forward, location: /users/7 }
"#;

fn manifest_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(MANIFEST.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_match_command_parses() {
    let cli = Cli::try_parse_from(["actionrouter", "match", "/a/*", "/a/b", "--prefix"]).unwrap();
    match cli.command {
        Commands::Match {
            pattern,
            path,
            prefix,
            separator,
        } => {
            assert_eq!(pattern, "/a/*");
            assert_eq!(path, "/a/b");
            assert!(prefix);
            assert_eq!(separator, '/');
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_match_output() {
    assert_eq!(run(&["actionrouter", "match", "/*/?", "/abc/d"]), "true\n");
    assert_eq!(run(&["actionrouter", "match", "/*/?", "/abc/de"]), "false\n");
    assert_eq!(
        run(&["actionrouter", "match", "--separator", ".", "a.*", "a.b"]),
        "true\n"
    );
}

#[test]
fn test_dispatch_requires_manifest() {
    assert!(Cli::try_parse_from(["actionrouter", "dispatch", "/x"]).is_err());
}

#[test]
fn test_dispatch_collects_args() {
    let cli = Cli::try_parse_from([
        "actionrouter",
        "dispatch",
        "--manifest",
        "m.yaml",
        "/x",
        "--arg",
        "1",
        "--arg",
        "two",
    ])
    .unwrap();
    match cli.command {
        Commands::Dispatch { args, handler_only, .. } => {
            assert_eq!(args, vec!["1", "two"]);
            assert!(!handler_only);
        }
        _ => panic!("Expected Dispatch command"),
    }
}

#[test]
fn test_routes_lists_chains() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let out = run(&["actionrouter", "routes", "--manifest", path]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["/old\tSingleton\t[]", "/users/{id}\tSingleton\t[trace]"]);
}

#[test]
fn test_resolve_reports_params() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let out = run(&["actionrouter", "resolve", "--manifest", path, "/users/42"]);
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["pattern"], "/users/{id}");
    assert_eq!(report["params"]["id"], "42");
    assert_eq!(report["chain"], serde_json::json!(["trace"]));
}

#[test]
fn test_dispatch_follows_forward_to_echo() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let out = run(&[
        "actionrouter",
        "dispatch",
        "--manifest",
        path,
        "/old",
        "--arg",
        "{\"a\":1}",
        "--arg",
        "plain",
    ]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["pattern"], "/users/{id}");
    assert_eq!(value["params"]["id"], "7");
    assert_eq!(value["args"], serde_json::json!([{"a": 1}, "plain"]));
}

#[test]
fn test_dispatch_uses_supplied_id() {
    let file = manifest_file();
    let path = file.path().to_str().unwrap();
    let id = crate::ids::InvocationId::new().to_string();
    let out = run(&[
        "actionrouter",
        "dispatch",
        "--manifest",
        path,
        "/users/3",
        "--id",
        id.as_str(),
    ]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["invocation_id"], id.as_str());

    // an unparseable id is replaced rather than rejected
    let out = run(&[
        "actionrouter",
        "dispatch",
        "--manifest",
        path,
        "/users/3",
        "--id",
        "not-a-ulid",
    ]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_ne!(value["invocation_id"], "not-a-ulid");
}

#[test]
fn test_dispatch_id_conflicts_with_handler_only() {
    assert!(Cli::try_parse_from([
        "actionrouter",
        "dispatch",
        "--manifest",
        "m.yaml",
        "/x",
        "--id",
        "01ARZ3NDEKTSV4RRFFQ69G5FAV",
        "--handler-only",
    ])
    .is_err());
}
