// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{PrefsStore, PREFS_FILENAME};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[fixture]
fn tmp() -> TempDir {
    TempDir::new("prefs")
}

#[rstest]
fn set_then_get_round_trips(tmp: TempDir) {
    let prefs = PrefsStore::open(tmp.path());
    assert_eq!(prefs.get("screen"), None);

    prefs.set("screen", "login:login");
    assert_eq!(prefs.get("screen"), Some("login:login".to_owned()));
}

#[rstest]
fn entries_survive_reopen(tmp: TempDir) {
    {
        let prefs = PrefsStore::open(tmp.path());
        prefs.set("screen", "login:login");
        prefs.set("data_source", "Local development");
    }

    let reopened = PrefsStore::open(tmp.path());
    assert_eq!(reopened.get("screen"), Some("login:login".to_owned()));
    assert_eq!(reopened.get("data_source"), Some("Local development".to_owned()));
}

#[rstest]
fn file_keys_carry_the_namespace_prefix(tmp: TempDir) {
    let prefs = PrefsStore::open(tmp.path());
    prefs.set("version", "v2.0.0");

    let text = fs::read_to_string(tmp.path().join(PREFS_FILENAME)).expect("prefs file written");
    assert!(text.contains("\"proteus:version\""));
}

#[rstest]
fn corrupt_file_degrades_to_empty(tmp: TempDir) {
    fs::write(tmp.path().join(PREFS_FILENAME), "{not json").unwrap();

    let prefs = PrefsStore::open(tmp.path());
    assert_eq!(prefs.get("screen"), None);

    // Writing afterwards recovers the file.
    prefs.set("screen", "a:b");
    let reopened = PrefsStore::open(tmp.path());
    assert_eq!(reopened.get("screen"), Some("a:b".to_owned()));
}

#[rstest]
fn missing_directory_is_created_on_first_write(tmp: TempDir) {
    let nested = tmp.path().join("deep").join("prefs");
    let prefs = PrefsStore::open(&nested);
    prefs.set("variant", "default");

    let reopened = PrefsStore::open(&nested);
    assert_eq!(reopened.get("variant"), Some("default".to_owned()));
}

#[test]
fn in_memory_store_never_touches_disk() {
    let prefs = PrefsStore::in_memory();
    prefs.set("screen", "login:login");
    assert_eq!(prefs.get("screen"), Some("login:login".to_owned()));
}

#[rstest]
fn unwritable_directory_degrades_to_in_memory(tmp: TempDir) {
    // A file where the directory should be makes every write fail.
    let blocked = tmp.path().join("blocked");
    fs::write(&blocked, "file, not dir").unwrap();

    let prefs = PrefsStore::open(&blocked);
    prefs.set("screen", "login:login");
    assert_eq!(prefs.get("screen"), Some("login:login".to_owned()));
}
