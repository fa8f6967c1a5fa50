// tests/common/mod.rs
//! Shared fixtures for the connector integration tests.
//!
//! `authenticated` returns a connector whose token reply has already been
//! consumed; tests then queue replies on `connector.transport()`.

#![allow(dead_code)]

use feishu_connector::{
    AppCredentials, FeishuConnector, RecordingObserver, ScriptedTransport, WebhookRegistry,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const NODE: &str = "wikcnQ8cTkEr1";
pub const APP: &str = "bascnXy7Lm2";
pub const SHEET: &str = "shtcnP0q9Rz";
pub const TABLE: &str = "tblK3vWq8";

pub fn registry() -> WebhookRegistry {
    WebhookRegistry::new([
        ("default", "https://hook.example/x"),
        ("ops", "https://hook.example/ops"),
    ])
    .unwrap()
}

pub fn token_reply() -> Value {
    json!({"code": 0, "msg": "ok", "tenant_access_token": "t-g1044abc", "expire": 7200})
}

pub async fn authenticated() -> FeishuConnector<ScriptedTransport> {
    let transport = ScriptedTransport::new().with_json(token_reply());
    let mut connector = FeishuConnector::with_transport(transport, registry());
    connector
        .authenticate(AppCredentials::new("cli_a1b2", "s3cret").unwrap())
        .await
        .unwrap();
    connector
}

pub async fn observed() -> (FeishuConnector<ScriptedTransport>, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let connector = authenticated().await.with_observer(observer.clone());
    (connector, observer)
}

/// `data` of a `get_node` reply.
pub fn node_data(obj_type: &str, obj_token: &str) -> Value {
    json!({
        "node": {
            "space_id": "7034502641455497244",
            "node_token": NODE,
            "obj_token": obj_token,
            "obj_type": obj_type,
            "title": "Weekly metrics",
            "has_child": false
        }
    })
}

pub fn record(id: &str, fields: Value) -> Value {
    json!({"record_id": id, "fields": fields})
}

/// `data` of one records page.
pub fn records_page(items: Vec<Value>, has_more: bool, page_token: Option<&str>) -> Value {
    json!({
        "items": items,
        "has_more": has_more,
        "page_token": page_token,
        "total": null
    })
}

pub fn numbered_records(range: std::ops::Range<usize>) -> Vec<Value> {
    range
        .map(|i| record(&format!("rec{:04}", i), json!({"n": i})))
        .collect()
}
