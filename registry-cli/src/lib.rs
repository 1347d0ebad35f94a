//! Command surface of `namespacectl`.
//!
//! Parsing lives here rather than in `main.rs` so the commands can be driven
//! against any store in tests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use registry_kv::KvHandler;
use registry_model::Namespace;
use registry_store::{Clock, NamespaceState, NamespaceStore};
use serde_json::{json, Value};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "namespacectl")]
#[command(about = "Inspect and edit the namespace table of a registry node")]
pub struct Cli {
    /// Path to the node's key-value database
    #[arg(long, default_value = "namespaces.db")]
    pub db: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a namespace, replacing any namespace with the same name
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        token: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Change the owner and comment of a namespace
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        owner: String,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Replace the access token of a namespace
    RotateToken {
        #[arg(long)]
        name: String,
        #[arg(long)]
        token: String,
    },
    /// Show a live namespace (null when absent or deleted)
    Get {
        #[arg(long)]
        name: String,
    },
    /// Show whether a namespace is live, deleted or unknown
    State {
        #[arg(long)]
        name: String,
    },
    /// List namespaces whose owner contains the given text
    List {
        #[arg(long)]
        owner: String,
    },
    /// Show one page of namespaces, most recently modified first
    Page {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show namespaces modified after an RFC 3339 instant
    Since {
        #[arg(long)]
        mtime: DateTime<Utc>,
    },
}

/// Executes one command and returns what should be printed.
pub fn run<H: KvHandler, C: Clock>(store: &NamespaceStore<H, C>, command: Command) -> Result<Value> {
    match command {
        Command::Add {
            name,
            owner,
            token,
            comment,
        } => {
            let namespace = Namespace::new(name, owner, token).with_comment(comment);
            store
                .add_namespace(&namespace)
                .context("failed to add namespace")?;
            info!(name = %namespace.name, "namespace added");
            Ok(serde_json::to_value(namespace)?)
        }
        Command::Update {
            name,
            owner,
            comment,
        } => {
            let namespace = Namespace::new(name, owner, String::new()).with_comment(comment);
            store
                .update_namespace(&namespace)
                .context("failed to update namespace")?;
            Ok(serde_json::to_value(store.get_namespace(&namespace.name)?)?)
        }
        Command::RotateToken { name, token } => {
            store
                .update_namespace_token(&name, &token)
                .context("failed to rotate namespace token")?;
            info!(name = %name, "namespace token rotated");
            Ok(json!({ "name": name, "rotated": true }))
        }
        Command::Get { name } => Ok(serde_json::to_value(store.get_namespace(&name)?)?),
        Command::State { name } => {
            let state = store.namespace_state(&name)?;
            Ok(match state {
                NamespaceState::NotFound => json!({ "state": "not_found" }),
                NamespaceState::Deleted(ns) => json!({ "state": "deleted", "namespace": ns }),
                NamespaceState::Found(ns) => json!({ "state": "found", "namespace": ns }),
            })
        }
        Command::List { owner } => {
            let mut items = store.list_namespaces(&owner)?;
            items.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(serde_json::to_value(items)?)
        }
        Command::Page { offset, limit } => {
            let (items, _) = store.get_namespaces(&Default::default(), offset, limit)?;
            Ok(json!({ "offset": offset, "limit": limit, "items": items }))
        }
        Command::Since { mtime } => {
            let items = store.get_more_namespaces(mtime)?;
            let watermark = items.iter().map(|ns| ns.modify_time).max().unwrap_or(mtime);
            Ok(json!({ "watermark": watermark, "items": items }))
        }
    }
}
