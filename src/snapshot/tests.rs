// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::json;

use super::{snapshot_entries, DEFAULT_MAX_DEPTH};

#[test]
fn flattens_nested_objects_with_sorted_keys() {
    let value = json!({
        "screen": {"name": "login", "links": ["a", "b"]},
        "client": {"id": "abc"}
    });

    let entries = snapshot_entries(&value, DEFAULT_MAX_DEPTH);
    let paths: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();

    assert_eq!(paths, ["client", "client.id", "screen", "screen.links", "screen.name"]);
}

#[test]
fn reports_kinds_and_previews() {
    let value = json!({
        "flag": true,
        "count": 3,
        "name": "alice",
        "nothing": null,
        "list": [1, 2, 3],
        "nested": {"a": 1, "b": 2}
    });

    let entries = snapshot_entries(&value, DEFAULT_MAX_DEPTH);
    let row = |path: &str| entries.iter().find(|entry| entry.path == path).expect("row exists");

    assert_eq!(row("flag").kind, "boolean");
    assert_eq!(row("flag").preview, "true");
    assert_eq!(row("count").preview, "3");
    assert_eq!(row("name").preview, "\"alice\"");
    assert_eq!(row("nothing").kind, "null");
    assert_eq!(row("list").kind, "array");
    assert_eq!(row("list").preview, "[3 items]");
    assert_eq!(row("nested").preview, "{2 keys}");
}

#[test]
fn arrays_are_not_descended_into() {
    let value = json!({"list": [{"hidden": 1}]});
    let entries = snapshot_entries(&value, DEFAULT_MAX_DEPTH);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "list");
}

#[test]
fn depth_limit_caps_recursion() {
    let value = json!({"a": {"b": {"c": {"d": 1}}}});

    let entries = snapshot_entries(&value, 1);
    let paths: Vec<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
    // Depth 0 lists "a", depth 1 lists "a.b"; "a.b.c" is not expanded further.
    assert_eq!(paths, ["a", "a.b"]);
}

#[test]
fn non_object_roots_produce_an_empty_snapshot() {
    assert!(snapshot_entries(&json!([1, 2]), DEFAULT_MAX_DEPTH).is_empty());
    assert!(snapshot_entries(&json!("text"), DEFAULT_MAX_DEPTH).is_empty());
    assert!(snapshot_entries(&json!(null), DEFAULT_MAX_DEPTH).is_empty());
}

#[test]
fn long_string_previews_are_truncated() {
    let long = "x".repeat(200);
    let value = json!({ "long": long });
    let entries = snapshot_entries(&value, DEFAULT_MAX_DEPTH);
    assert!(entries[0].preview.chars().count() <= 61);
    assert!(entries[0].preview.ends_with('…'));
}
