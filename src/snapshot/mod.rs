// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flattened snapshot of a context value.
//!
//! Produces one row per nested key up to a depth limit, for quick visual inspection
//! without drilling into the JSON text. Keys are listed sorted at each level; arrays are
//! reported but not descended into.

use serde_json::Value;

pub const DEFAULT_MAX_DEPTH: usize = 3;

const PREVIEW_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Dotted key path, e.g. `screen.links`.
    pub path: String,
    pub kind: &'static str,
    pub preview: String,
}

/// Flattens `value` into path rows. The root itself gets no row; non-object roots
/// produce an empty snapshot.
pub fn snapshot_entries(value: &Value, max_depth: usize) -> Vec<SnapshotEntry> {
    let mut entries = Vec::new();
    collect(value, "", 0, max_depth, &mut entries);
    entries
}

fn collect(
    value: &Value,
    base_path: &str,
    depth: usize,
    max_depth: usize,
    entries: &mut Vec<SnapshotEntry>,
) {
    let Some(object) = value.as_object() else {
        return;
    };
    if depth > max_depth {
        return;
    }

    let mut fields: Vec<(&String, &Value)> = object.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (key, child) in fields {
        let path = if base_path.is_empty() { key.clone() } else { format!("{base_path}.{key}") };
        entries.push(SnapshotEntry {
            path: path.clone(),
            kind: kind_of(child),
            preview: preview_of(child),
        });
        if child.is_object() && depth < max_depth {
            collect(child, &path, depth + 1, max_depth, entries);
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview_of(value: &Value) -> String {
    let text = match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => format!("{text:?}"),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} keys}}", fields.len()),
    };
    truncate_preview(text)
}

fn truncate_preview(text: String) -> String {
    if text.chars().count() <= PREVIEW_MAX_CHARS {
        return text;
    }
    let mut shortened: String = text.chars().take(PREVIEW_MAX_CHARS).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests;
