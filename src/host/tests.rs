// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use serde_json::json;

use super::{ConnectionState, ContextSubscription, ContextUpdate, HostStore, MemoryHost};

#[test]
fn get_returns_cloned_snapshot() {
    let host = MemoryHost::new();
    host.set("ctx", json!({"a": 1}));

    let mut snapshot = host.get("ctx").expect("value present");
    snapshot["a"] = json!(2);

    assert_eq!(host.get("ctx"), Some(json!({"a": 1})));
}

#[test]
fn missing_key_reads_none() {
    let host = MemoryHost::new();
    assert_eq!(host.get("ctx"), None);
}

#[test]
fn connection_state_requires_present_non_null_value() {
    let host = MemoryHost::new();
    assert_eq!(ConnectionState::capture(&host, "ctx"), ConnectionState::Preview);

    host.set("ctx", json!(null));
    assert_eq!(ConnectionState::capture(&host, "ctx"), ConnectionState::Preview);

    host.set("ctx", json!({"screen": {"name": "login"}}));
    assert_eq!(ConnectionState::capture(&host, "ctx"), ConnectionState::Connected);
}

#[test]
fn connection_state_is_captured_once_and_never_recomputed() {
    let host = MemoryHost::new();
    let state = ConnectionState::capture(&host, "ctx");
    assert!(!state.is_connected());

    // A later write does not affect the captured value.
    host.set("ctx", json!({"screen": {"name": "login"}}));
    assert!(!state.is_connected());
}

#[tokio::test]
async fn subscription_rereads_fresh_value_on_announce() {
    let host: Arc<dyn HostStore> = Arc::new(MemoryHost::new());
    let mut subscription = ContextSubscription::new(host.clone(), "ctx", "ctx:updated");

    assert_eq!(subscription.current(), None);

    // The announced payload is stale on purpose; the subscription must re-read.
    host.set("ctx", json!({"rev": 1}));
    host.announce(ContextUpdate {
        event: "ctx:updated".to_owned(),
        key: "ctx".to_owned(),
        value: json!({"rev": 0}),
    });
    host.set("ctx", json!({"rev": 2}));

    let value = subscription.changed().await.expect("value present");
    assert_eq!(value, json!({"rev": 2}));
}

#[tokio::test]
async fn subscription_ignores_other_events_and_keys() {
    let host: Arc<dyn HostStore> = Arc::new(MemoryHost::new());
    let mut subscription = ContextSubscription::new(host.clone(), "ctx", "ctx:updated");

    host.set("ctx", json!("fresh"));
    host.announce(ContextUpdate {
        event: "other:updated".to_owned(),
        key: "ctx".to_owned(),
        value: json!("noise"),
    });
    host.announce(ContextUpdate {
        event: "ctx:updated".to_owned(),
        key: "other".to_owned(),
        value: json!("noise"),
    });
    host.announce(ContextUpdate {
        event: "ctx:updated".to_owned(),
        key: "ctx".to_owned(),
        value: json!("fresh"),
    });

    assert_eq!(subscription.changed().await, Some(json!("fresh")));
}
