//! Shared test helpers for handler tests.

#![allow(dead_code)]

use registry_kv::{FieldMap, KvHandler};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const TABLE: &str = "service";

/// A small record type exercising strings, numbers and booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    pub name: String,
    pub owner: String,
    pub port: u16,
    pub healthy: bool,
}

pub fn service(name: &str, owner: &str, port: u16) -> Service {
    Service {
        name: name.to_string(),
        owner: owner.to_string(),
        port,
        healthy: true,
    }
}

pub fn fields(value: serde_json::Value) -> FieldMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Seeds `TABLE` with three services owned by two teams.
pub fn seed<H: KvHandler>(handler: &H) {
    handler.save_value(TABLE, "api", &service("api", "team-a", 80)).unwrap();
    handler.save_value(TABLE, "db", &service("db", "team-b", 5432)).unwrap();
    handler.save_value(TABLE, "cache", &service("cache", "team-a", 6379)).unwrap();
}

/// Runs the behaviour every handler must share.
pub fn check_contract<H: KvHandler>(handler: &H) {
    // ── save + load ──
    seed(handler);
    let loaded = handler.load_values::<Service>(TABLE, &["api", "missing"]).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["api"], service("api", "team-a", 80));

    // ── upsert overwrites ──
    handler.save_value(TABLE, "api", &service("api", "team-c", 8080)).unwrap();
    let loaded = handler.load_values::<Service>(TABLE, &["api"]).unwrap();
    assert_eq!(loaded["api"].owner, "team-c");
    assert_eq!(loaded["api"].port, 8080);

    // ── partial update touches only named fields ──
    handler
        .update_value(TABLE, "db", fields(json!({"Owner": "team-z"})))
        .unwrap();
    let mut loaded = handler.load_values::<Service>(TABLE, &["db"]).unwrap();
    let db = loaded.remove("db").unwrap();
    assert_eq!(db.owner, "team-z");
    assert_eq!(db.port, 5432);
    assert!(db.healthy);

    // ── update of a missing key writes nothing ──
    handler
        .update_value(TABLE, "ghost", fields(json!({"Owner": "nobody"})))
        .unwrap();
    assert!(handler.load_values::<Service>(TABLE, &["ghost"]).unwrap().is_empty());

    // ── filter sees only watched fields ──
    let mut seen = Vec::new();
    let matched = handler
        .load_values_by_filter::<Service, _>(TABLE, &["Owner"], |record| {
            seen.push(record.clone());
            record.get("Owner").and_then(|v| v.as_str()) == Some("team-a")
        })
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert!(matched.contains_key("cache"));
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|r| r.len() == 1 && r.contains_key("Owner")));

    // ── full scan ──
    let all = handler.load_values_all::<Service>(TABLE).unwrap();
    assert_eq!(all.len(), 3);

    // ── tables are independent ──
    assert!(handler.load_values_all::<Service>("other").unwrap().is_empty());
}
