//! namespacectl
//!
//! Operator tool for the namespace table of a registry control-plane node.
//! Opens the node's key-value database directly, so run it only while the
//! node is stopped or against a copy.
//!
//! Usage:
//!   namespacectl --db node.db add --name payments --owner team-a --token s3cret
//!   namespacectl --db node.db since --mtime 2024-01-01T00:00:00Z

use anyhow::{Context, Result};
use clap::Parser;
use registry_cli::{run, Cli};
use registry_kv::SqliteHandler;
use registry_store::NamespaceStore;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    info!(db = %cli.db.display(), "opening namespace store");
    let handler = SqliteHandler::open(&cli.db)
        .with_context(|| format!("failed to open {}", cli.db.display()))?;
    let store = NamespaceStore::new(handler);

    let output = run(&store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
