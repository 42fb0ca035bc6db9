// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_json::json;

use super::client::ManifestError;
use super::resolver::ManifestResolver;
use super::Manifest;

fn sample_manifest() -> Manifest {
    Manifest::from_value(&json!({
        "screens": [
            {
                "login": {
                    "login": {"path": "/screens/login/login/", "variants": ["default", "passkeys"]},
                    "login-id": {}
                }
            },
            {
                "signup": {
                    "signup": {"variants": []}
                }
            }
        ],
        "versions": ["v1.2.0", "v2.0.0"]
    }))
    .expect("valid manifest")
}

#[test]
fn from_value_requires_screens_array() {
    assert!(Manifest::from_value(&json!({"foo": 1})).is_none());
    assert!(Manifest::from_value(&json!({"screens": {}})).is_none());
    assert!(Manifest::from_value(&json!({"screens": "nope"})).is_none());
    assert!(Manifest::from_value(&json!({"screens": []})).is_some());
}

#[test]
fn from_value_tolerates_junk_entries_and_versions() {
    let manifest = Manifest::from_value(&json!({
        "screens": [{"a": {"b": {}}}, 42, "junk", null],
        "versions": ["v1", 7, null, "v2"]
    }))
    .expect("valid manifest");

    assert_eq!(manifest.screens().len(), 1);
    assert_eq!(manifest.versions(), ["v1", "v2"]);
}

#[test]
fn missing_versions_default_to_empty() {
    let manifest = Manifest::from_value(&json!({"screens": []})).expect("valid manifest");
    assert!(manifest.versions().is_empty());
}

#[test]
fn screen_options_preserve_encounter_order() {
    let manifest = sample_manifest();
    let options = manifest.screen_options();

    let values: Vec<&str> = options.iter().map(|option| option.value.as_str()).collect();
    assert_eq!(values, ["login:login", "login:login-id", "signup:signup"]);
    assert_eq!(options[0].label, "login / login");
}

#[test]
fn variant_info_defaults_path_and_variants() {
    let manifest = sample_manifest();

    let info = manifest.variant_info("login:login-id").expect("screen exists");
    assert_eq!(info.base_path, "/screens/login/login-id");
    assert_eq!(info.variants, ["default"]);

    // An explicitly empty variants list also falls back.
    let info = manifest.variant_info("signup:signup").expect("screen exists");
    assert_eq!(info.variants, ["default"]);
}

#[test]
fn variant_info_trims_trailing_slash() {
    let manifest = sample_manifest();
    let info = manifest.variant_info("login:login").expect("screen exists");
    assert_eq!(info.base_path, "/screens/login/login");
    assert_eq!(info.variants, ["default", "passkeys"]);
}

#[test]
fn variant_info_uses_first_match_for_duplicate_ids() {
    let manifest = Manifest::from_value(&json!({
        "screens": [
            {"login": {"login": {"path": "/first"}}},
            {"login": {"login": {"path": "/second"}}}
        ]
    }))
    .expect("valid manifest");

    let info = manifest.variant_info("login:login").expect("screen exists");
    assert_eq!(info.base_path, "/first");
}

#[test]
fn variant_info_rejects_unknown_and_malformed_ids() {
    let manifest = sample_manifest();
    assert!(manifest.variant_info("nope:nope").is_none());
    assert!(manifest.variant_info("login").is_none());
    assert!(manifest.variant_info("").is_none());
}

#[test]
fn first_screen_id_follows_entry_order() {
    assert_eq!(sample_manifest().first_screen_id(), Some("login:login".to_owned()));

    let empty = Manifest::from_value(&json!({"screens": []})).expect("valid manifest");
    assert_eq!(empty.first_screen_id(), None);
}

#[test]
fn resolver_clears_error_on_begin_and_reports_shape_failures() {
    let mut resolver = ManifestResolver::new();

    let ticket = resolver.begin();
    assert!(resolver.loading());
    assert!(resolver.error().is_none());

    assert!(resolver.complete(ticket, Err(ManifestError::InvalidShape)));
    assert!(!resolver.loading());
    assert_eq!(resolver.error(), Some("Invalid manifest shape"));
    assert!(resolver.manifest().is_none());

    let ticket = resolver.begin();
    assert!(resolver.error().is_none());
    assert!(resolver.complete(ticket, Ok(sample_manifest())));
    assert!(resolver.has_loaded());
}

#[test]
fn resolver_drops_stale_outcomes() {
    let mut resolver = ManifestResolver::new();

    let stale = resolver.begin();
    let fresh = resolver.begin();

    // The superseded cycle cannot commit, succeed or fail.
    assert!(!resolver.complete(stale, Ok(sample_manifest())));
    assert!(resolver.manifest().is_none());
    assert!(resolver.loading());

    assert!(resolver.complete(fresh, Err(ManifestError::InvalidShape)));
    assert!(!resolver.loading());
}

#[test]
fn resolver_failure_retains_previous_manifest() {
    let mut resolver = ManifestResolver::new();

    let ticket = resolver.begin();
    resolver.complete(ticket, Ok(sample_manifest()));

    let ticket = resolver.begin();
    resolver.complete(ticket, Err(ManifestError::InvalidShape));

    assert!(resolver.has_loaded());
    assert_eq!(resolver.error(), Some("Invalid manifest shape"));
    assert_eq!(resolver.screen_options().len(), 3);
}
