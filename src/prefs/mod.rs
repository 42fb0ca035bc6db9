// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Best-effort preference persistence.
//!
//! Selections survive across runs in a single JSON object file. Persistence is strictly a
//! convenience: a missing directory, unreadable file, or failed write silently degrades to
//! in-memory-only behavior. Nothing in here returns an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Namespace applied to every key before it reaches the file.
pub const PREFS_PREFIX: &str = "proteus:";
pub const PREFS_FILENAME: &str = "proteus-prefs.json";

#[derive(Debug)]
pub struct PrefsStore {
    dir: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl PrefsStore {
    /// Opens the preference file under `dir`, tolerating absence and corruption.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let entries = load_entries(&dir.join(PREFS_FILENAME));
        Self {
            dir: Some(dir),
            entries: Mutex::new(entries),
        }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().expect("prefs lock poisoned");
        entries.get(&prefixed(key)).cloned()
    }

    /// Stores one entry and persists the whole map, best-effort.
    pub fn set(&self, key: &str, value: impl Into<String>) {
        let snapshot = {
            let mut entries = self.entries.lock().expect("prefs lock poisoned");
            entries.insert(prefixed(key), value.into());
            entries.clone()
        };
        if let Some(dir) = &self.dir {
            write_entries(dir, &snapshot);
        }
    }
}

fn prefixed(key: &str) -> String {
    format!("{PREFS_PREFIX}{key}")
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(text) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    serde_json::from_str(&text).unwrap_or_default()
}

fn write_entries(dir: &Path, entries: &BTreeMap<String, String>) {
    let Ok(text) = serde_json::to_string_pretty(entries) else {
        return;
    };

    if fs::create_dir_all(dir).is_err() {
        return;
    }

    // Temp file plus rename so a torn write never corrupts the previous file.
    let path = dir.join(PREFS_FILENAME);
    let tmp_path = dir.join(format!("{PREFS_FILENAME}.tmp"));
    if fs::write(&tmp_path, format!("{text}\n")).is_err() {
        return;
    }
    if fs::rename(&tmp_path, &path).is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
}

#[cfg(test)]
mod tests;
