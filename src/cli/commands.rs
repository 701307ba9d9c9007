use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::action::ObjectCatalog;
use crate::ids::InvocationId;
use crate::logging::{init_logging, LogConfig};
use crate::manifest::load_manifest;
use crate::matcher::PathMatcher;
use crate::service::ActionRouter;

/// Command-line interface for actionrouter
///
/// Inspect and exercise a router described by a manifest.
#[derive(Parser)]
#[command(name = "actionrouter")]
#[command(about = "In-process action router CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Test a glob pattern against a path
    Match {
        /// Glob pattern (`?`, `*`, `**`)
        pattern: String,

        /// Candidate path
        path: String,

        /// Treat the path as a prefix that could still be completed
        #[arg(long, default_value_t = false)]
        prefix: bool,

        /// Segment separator
        #[arg(long, default_value_t = '/')]
        separator: char,
    },
    /// List registered patterns with lifecycle and interceptor chain
    Routes {
        /// Manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Resolve a path and show the match
    Resolve {
        /// Manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to resolve
        path: String,
    },
    /// Dispatch a path through the full pipeline
    ///
    /// Handler types the manifest names are answered by an echo handler.
    Dispatch {
        /// Manifest file (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Path to dispatch
        path: String,

        /// Call argument; parsed as JSON, otherwise passed as a string
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Invocation id (ULID) to log under; a fresh one when absent or invalid
        #[arg(long, conflicts_with = "handler_only")]
        id: Option<String>,

        /// Skip interceptors
        #[arg(long, default_value_t = false)]
        handler_only: bool,
    },
}

/// Parse the process arguments, install logging and run the command,
/// printing to stdout.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env())?;
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Run `cli` writing command output to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Match {
            pattern,
            path,
            prefix,
            separator,
        } => {
            let matcher = PathMatcher::new(*separator);
            let matched = if *prefix {
                matcher.match_start(pattern, path)
            } else {
                matcher.matches(pattern, path)
            };
            writeln!(out, "{matched}")?;
        }
        Commands::Routes { manifest } => {
            let router = build_router(manifest)?;
            let mut handlers = router.handlers();
            handlers.sort_by(|a, b| a.path().cmp(b.path()));
            for descriptor in handlers {
                let chain = router
                    .chain_for(&descriptor)
                    .with_context(|| format!("chain for '{}'", descriptor.path()))?;
                let names: Vec<&str> = chain.iter().map(|i| i.name()).collect();
                writeln!(
                    out,
                    "{}\t{:?}\t[{}]",
                    descriptor.path(),
                    descriptor.lifecycle(),
                    names.join(", ")
                )?;
            }
        }
        Commands::Resolve { manifest, path } => {
            let router = build_router(manifest)?;
            let matched = router
                .resolve(path)
                .ok_or_else(|| anyhow::anyhow!("no handler registered for path '{path}'"))?;
            let chain = router.chain_for(&matched.descriptor)?;
            let report = json!({
                "pattern": matched.descriptor.path(),
                "params": matched.path_params_map(),
                "namespace": matched.descriptor.namespace(),
                "chain": chain.iter().map(|i| i.name()).collect::<Vec<_>>(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        Commands::Dispatch {
            manifest,
            path,
            args,
            id,
            handler_only,
        } => {
            let router = build_router(manifest)?;
            let params = args.iter().map(|a| parse_arg(a)).collect();
            let value = if *handler_only {
                router.invoke_handler_only(path, params)?
            } else {
                let id = InvocationId::parse_or_new(id.as_deref());
                router.dispatch_with_id(id, path, params)?
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
    }
    Ok(())
}

fn build_router(manifest: &Path) -> anyhow::Result<ActionRouter> {
    let factory = ObjectCatalog::new()
        .with_echo_fallback()
        .with_builtin_interceptors();
    load_manifest(manifest)?.into_router(Arc::new(factory))
}

fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
