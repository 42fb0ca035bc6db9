// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Selection state for preview sessions.
//!
//! Four fields (screen, variant, data source, version) each stay valid against their live
//! option list: whenever a list changes, a selection that fell out of it is repaired to the
//! list's first entry. Choices are restored from the preference store at startup and
//! persisted after every confirmed change, but only once initialization (the local-manifest
//! probe) has completed, so a transient default is never written.

use std::cmp::Ordering;

use serde_json::Value;

use crate::manifest::{Manifest, ScreenOption, DEFAULT_VARIANT};
use crate::prefs::PrefsStore;

pub const DATA_SOURCE_CDN: &str = "Remote CDN";
pub const DATA_SOURCE_LOCAL: &str = "Local development";
/// Screen preselected for fresh CDN sessions that supplied no default of their own.
pub const CDN_BOOTSTRAP_SCREEN: &str = "login-id:login-id";
pub const FALLBACK_VERSION: &str = "0";

pub const PREF_SCREEN: &str = "screen";
pub const PREF_VARIANT: &str = "variant";
pub const PREF_DATA_SOURCE: &str = "data_source";
pub const PREF_VERSION: &str = "version";

/// Where the panel is in its open/probe lifecycle. Data-source-dependent UI must not
/// render before `Open`, or the wrong default flashes while the probe is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelLifecycle {
    Closed,
    Initializing,
    Open,
}

/// What the JSON buffer currently holds. A manifest-driven preview may only overwrite
/// the buffer while provenance is not `UserEdited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferProvenance {
    FromRoot,
    FromManifestPreview,
    UserEdited,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionConfig {
    pub default_screen: Option<String>,
    pub default_variant: Option<String>,
    pub default_data_source: Option<String>,
    pub default_version: Option<String>,
}

/// A version select option. `value` is always the bare version string; the newest entry's
/// label carries a "(latest)" suffix for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOption {
    pub value: String,
    pub label: String,
}

pub fn is_local_source(data_source: &str) -> bool {
    data_source.to_lowercase().contains("local")
}

fn version_key(version: &str) -> Vec<i64> {
    version
        .trim_start_matches('v')
        .split('.')
        .map(|segment| segment.parse::<i64>().unwrap_or(0))
        .collect()
}

fn cmp_versions_desc(a: &str, b: &str) -> Ordering {
    let a_key = version_key(a);
    let b_key = version_key(b);
    let len = a_key.len().max(b_key.len());
    for index in 0..len {
        let a_segment = a_key.get(index).copied().unwrap_or(0);
        let b_segment = b_key.get(index).copied().unwrap_or(0);
        match b_segment.cmp(&a_segment) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    Ordering::Equal
}

/// Dotted version strings, newest first. Equal sequences keep their input order.
pub fn sort_desc_versions(versions: &[String]) -> Vec<String> {
    let mut sorted = versions.to_vec();
    sorted.sort_by(|a, b| cmp_versions_desc(a, b));
    sorted
}

/// Select options for the version picker, newest first.
pub fn version_options(versions: &[String]) -> Vec<VersionOption> {
    sort_desc_versions(versions)
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let label =
                if index == 0 { format!("{value} (latest)") } else { value.clone() };
            VersionOption { value, label }
        })
        .collect()
}

/// Connected sessions display the screen the live context names, without persisting it.
pub fn connected_screen_label(context: &Value) -> Option<String> {
    let prompt = context.get("prompt")?.get("name")?.as_str()?;
    let screen = context.get("screen")?.get("name")?.as_str()?;
    Some(format!("{prompt} / {screen}"))
}

pub struct SelectionController {
    prefs: PrefsStore,
    default_screen: Option<String>,
    screen: Option<String>,
    variant: String,
    data_source: String,
    version: String,
    lifecycle: PanelLifecycle,
    provenance: BufferProvenance,
    local_manifest: Option<Manifest>,
    local_probe_failed: bool,
    probe_done: bool,
    had_persisted_screen: bool,
    had_persisted_data_source: bool,
    refetch_generation: u64,
}

impl SelectionController {
    /// Restores selections in precedence order: persisted value, supplied default, static
    /// fallback. A fresh CDN session with no screen default starts on the bootstrap screen.
    pub fn new(config: SelectionConfig, prefs: PrefsStore) -> Self {
        let persisted_screen = prefs.get(PREF_SCREEN);
        let persisted_variant = prefs.get(PREF_VARIANT);
        let persisted_data_source = prefs.get(PREF_DATA_SOURCE);
        let persisted_version = prefs.get(PREF_VERSION);
        let had_persisted_screen = persisted_screen.is_some();
        let had_persisted_data_source = persisted_data_source.is_some();

        let data_source = persisted_data_source
            .or(config.default_data_source)
            .unwrap_or_else(|| DATA_SOURCE_CDN.to_owned());

        let screen = persisted_screen.or_else(|| {
            if config.default_screen.is_none() && !is_local_source(&data_source) {
                Some(CDN_BOOTSTRAP_SCREEN.to_owned())
            } else {
                config.default_screen.clone()
            }
        });

        let variant = persisted_variant
            .or(config.default_variant)
            .unwrap_or_else(|| DEFAULT_VARIANT.to_owned());
        let version = persisted_version
            .or(config.default_version)
            .unwrap_or_else(|| FALLBACK_VERSION.to_owned());

        Self {
            prefs,
            default_screen: config.default_screen,
            screen,
            variant,
            data_source,
            version,
            lifecycle: PanelLifecycle::Initializing,
            provenance: BufferProvenance::FromManifestPreview,
            local_manifest: None,
            local_probe_failed: false,
            probe_done: false,
            had_persisted_screen,
            had_persisted_data_source,
            refetch_generation: 0,
        }
    }

    pub fn screen(&self) -> Option<&str> {
        self.screen.as_deref()
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn lifecycle(&self) -> PanelLifecycle {
        self.lifecycle
    }

    pub fn provenance(&self) -> BufferProvenance {
        self.provenance
    }

    /// True once the local-manifest probe has finished, success or failure.
    pub fn init_ready(&self) -> bool {
        self.probe_done
    }

    /// True when the probe failed and the local choice should render disabled.
    pub fn local_probe_failed(&self) -> bool {
        self.local_probe_failed
    }

    /// Bumped by every selection change; consumers refetch when it moves.
    pub fn refetch_generation(&self) -> u64 {
        self.refetch_generation
    }

    pub fn set_open(&mut self, open: bool) {
        self.lifecycle = if !open {
            PanelLifecycle::Closed
        } else if self.probe_done {
            PanelLifecycle::Open
        } else {
            PanelLifecycle::Initializing
        };
    }

    pub fn mark_user_edited(&mut self) {
        self.provenance = BufferProvenance::UserEdited;
    }

    pub fn mark_from_root(&mut self) {
        self.provenance = BufferProvenance::FromRoot;
    }

    /// Commits the one-shot local-manifest probe.
    ///
    /// `probe` is `None` on any failure (network, status, shape): the local choice is
    /// disabled for the session. On success the probed manifest backs data-source
    /// filtering, and a session with no persisted data-source choice that is not connected
    /// is promoted to local, preferring the supplied default screen when the local manifest
    /// has it and the first local screen otherwise.
    ///
    /// Completing the probe finishes initialization: the lifecycle opens and the restored
    /// selections are persisted for the first time.
    pub fn apply_local_probe(&mut self, connected: bool, probe: Option<Manifest>) {
        match probe {
            None => {
                self.local_probe_failed = true;
            }
            Some(manifest) => {
                if !self.had_persisted_data_source && !connected {
                    // Promotion picks its own screen unless one was persisted; a CDN
                    // bootstrap screen assigned at init does not count as a choice.
                    if !self.had_persisted_screen {
                        let target = self
                            .default_screen
                            .clone()
                            .filter(|screen| manifest.contains_screen(screen))
                            .or_else(|| manifest.first_screen_id());
                        if target.is_some() {
                            self.screen = target;
                        }
                    }
                    if !is_local_source(&self.data_source) {
                        self.data_source = DATA_SOURCE_LOCAL.to_owned();
                    }
                }
                self.local_manifest = Some(manifest);
            }
        }
        self.probe_done = true;
        if self.lifecycle == PanelLifecycle::Initializing {
            self.lifecycle = PanelLifecycle::Open;
        }
        self.persist_all();
    }

    /// Repairs the screen selection against a freshly resolved option list.
    pub fn repair_screen(&mut self, options: &[ScreenOption]) {
        if options.is_empty() {
            return;
        }
        let valid = self
            .screen
            .as_ref()
            .is_some_and(|screen| options.iter().any(|option| &option.value == screen));
        if !valid {
            self.screen = Some(options[0].value.clone());
            let screen = self.screen.clone().unwrap_or_default();
            self.persist_one(PREF_SCREEN, &screen);
        }
    }

    /// Variant options for the current screen; static fallback until a manifest is known.
    pub fn variant_options(&self, manifest: Option<&Manifest>) -> Vec<String> {
        let fallback = vec![DEFAULT_VARIANT.to_owned()];
        let Some(manifest) = manifest else {
            return fallback;
        };
        let Some(screen) = &self.screen else {
            return fallback;
        };
        manifest.variant_info(screen).map(|info| info.variants).unwrap_or(fallback)
    }

    /// Repairs the variant selection. Deliberately inert until a manifest has loaded, so a
    /// persisted variant is not overwritten before real options exist.
    pub fn repair_variant(&mut self, manifest: Option<&Manifest>) {
        let Some(manifest) = manifest else {
            return;
        };
        let options = self.variant_options(Some(manifest));
        if options.is_empty() {
            return;
        }
        if !options.iter().any(|variant| variant == &self.variant) {
            self.variant = options[0].clone();
            let variant = self.variant.clone();
            self.persist_one(PREF_VARIANT, &variant);
        }
    }

    /// Data-source options: the local choice disappears while the selected screen is
    /// missing from the probed local manifest.
    pub fn data_source_options(&self) -> Vec<String> {
        let all = vec![DATA_SOURCE_CDN.to_owned(), DATA_SOURCE_LOCAL.to_owned()];
        let Some(local_manifest) = &self.local_manifest else {
            return all;
        };
        let Some(screen) = &self.screen else {
            return all;
        };
        if local_manifest.contains_screen(screen) {
            all
        } else {
            all.into_iter().filter(|source| !is_local_source(source)).collect()
        }
    }

    pub fn repair_data_source(&mut self) {
        let options = self.data_source_options();
        if options.is_empty() {
            return;
        }
        if !options.contains(&self.data_source) {
            self.data_source = options[0].clone();
            let data_source = self.data_source.clone();
            self.persist_one(PREF_DATA_SOURCE, &data_source);
        }
    }

    /// Version options for the picker; manifest versions when present, static fallback
    /// otherwise.
    pub fn version_options(&self, manifest: Option<&Manifest>) -> Vec<VersionOption> {
        match manifest.filter(|manifest| !manifest.versions().is_empty()) {
            Some(manifest) => version_options(manifest.versions()),
            None => version_options(&[FALLBACK_VERSION.to_owned()]),
        }
    }

    /// Repairs the version selection against the descending-sorted option list, then lets
    /// CDN sessions track the newest published version even over a persisted choice. Local
    /// sessions keep theirs. Inert until a manifest has loaded, like the variant repair.
    pub fn repair_version(&mut self, manifest: Option<&Manifest>) {
        let Some(manifest) = manifest else {
            return;
        };
        let sorted = if manifest.versions().is_empty() {
            vec![FALLBACK_VERSION.to_owned()]
        } else {
            sort_desc_versions(manifest.versions())
        };
        if !sorted.contains(&self.version) {
            self.version = sorted[0].clone();
            let version = self.version.clone();
            self.persist_one(PREF_VERSION, &version);
        }

        if !manifest.versions().is_empty() && !is_local_source(&self.data_source) {
            let latest = &sorted[0];
            if &self.version != latest {
                self.version = latest.clone();
                let version = self.version.clone();
                self.persist_one(PREF_VERSION, &version);
            }
        }
    }

    pub fn set_screen(&mut self, screen: impl Into<String>) {
        self.screen = Some(screen.into());
        let screen = self.screen.clone().unwrap_or_default();
        self.persist_one(PREF_SCREEN, &screen);
        self.reset_preview();
    }

    pub fn set_variant(&mut self, variant: impl Into<String>) {
        self.variant = variant.into();
        let variant = self.variant.clone();
        self.persist_one(PREF_VARIANT, &variant);
        self.reset_preview();
    }

    pub fn set_data_source(&mut self, data_source: impl Into<String>) {
        self.data_source = data_source.into();
        let data_source = self.data_source.clone();
        self.persist_one(PREF_DATA_SOURCE, &data_source);
        self.reset_preview();
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
        let version = self.version.clone();
        self.persist_one(PREF_VERSION, &version);
        self.reset_preview();
    }

    // A selection change invalidates whatever preview the buffer held and forces the
    // fetch pipeline to run again.
    fn reset_preview(&mut self) {
        if self.provenance == BufferProvenance::UserEdited {
            self.provenance = BufferProvenance::FromManifestPreview;
        }
        self.refetch_generation += 1;
    }

    fn persist_one(&self, key: &str, value: &str) {
        if self.probe_done {
            self.prefs.set(key, value);
        }
    }

    fn persist_all(&self) {
        if !self.probe_done {
            return;
        }
        if let Some(screen) = &self.screen {
            self.prefs.set(PREF_SCREEN, screen.clone());
        }
        self.prefs.set(PREF_VARIANT, self.variant.clone());
        self.prefs.set(PREF_DATA_SOURCE, self.data_source.clone());
        self.prefs.set(PREF_VERSION, self.version.clone());
    }
}
