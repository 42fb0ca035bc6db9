// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Screen manifest: the catalog of screens, variants, and versions a preview session can
//! choose from.
//!
//! Manifests arrive as loosely shaped JSON and are kept permissive on purpose: unknown
//! fields are ignored, malformed entries are skipped, and only the `screens` array is
//! required. Screen entries keep their encounter order; nothing here sorts.

use serde::Deserialize;
use serde_json::{Map, Value};

pub mod client;
pub mod resolver;

pub use client::{ManifestClient, ManifestError, CDN_BASE_DEFAULT, LOCAL_BASE_DEFAULT};
pub use resolver::{FetchTicket, ManifestResolver};

pub const DEFAULT_VARIANT: &str = "default";

/// One entry of the manifest's `screens` array: `topKey -> childKey -> variant node`.
pub type ScreenEntry = Map<String, Value>;

/// A select option for one screen, `value` being the composite `topKey:childKey` id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOption {
    pub value: String,
    pub label: String,
}

/// Resolved variant data for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantInfo {
    pub base_path: String,
    pub variants: Vec<String>,
}

// Wire mirror, permissive on purpose: only the `screens` array is load-bearing,
// everything else tolerates partial or evolving manifests.
#[derive(Debug, Deserialize)]
struct ManifestJson {
    screens: Vec<Value>,
    #[serde(default)]
    versions: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    screens: Vec<ScreenEntry>,
    versions: Vec<String>,
}

impl Manifest {
    /// Accepts a fetched JSON body as a manifest.
    ///
    /// The only hard requirement is an array-typed `screens` field; anything else is
    /// rejected as a shape error by the caller. Non-object screen entries and non-string
    /// versions are dropped silently.
    pub fn from_value(value: &Value) -> Option<Self> {
        let json = ManifestJson::deserialize(value).ok()?;
        let screens = json
            .screens
            .iter()
            .filter_map(|entry| entry.as_object().cloned())
            .collect();
        let versions = json
            .versions
            .as_array()
            .map(|versions| {
                versions
                    .iter()
                    .filter_map(|version| version.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        Some(Self { screens, versions })
    }

    pub fn screens(&self) -> &[ScreenEntry] {
        &self.screens
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Flattens the screen entries into select options, preserving encounter order.
    pub fn screen_options(&self) -> Vec<ScreenOption> {
        let mut options = Vec::new();
        for entry in &self.screens {
            for (top_key, container) in entry {
                let Some(container) = container.as_object() else {
                    continue;
                };
                for child_key in container.keys() {
                    options.push(ScreenOption {
                        value: format!("{top_key}:{child_key}"),
                        label: format!("{top_key} / {child_key}"),
                    });
                }
            }
        }
        options
    }

    fn variant_node(&self, screen_id: &str) -> Option<&Value> {
        let (top_key, child_key) = screen_id.split_once(':')?;
        // Duplicate ids across entries resolve to the first match in entry order.
        self.screens
            .iter()
            .find_map(|entry| entry.get(top_key)?.as_object()?.get(child_key))
    }

    pub fn contains_screen(&self, screen_id: &str) -> bool {
        self.variant_node(screen_id).is_some()
    }

    /// The first screen id in encounter order, if any.
    pub fn first_screen_id(&self) -> Option<String> {
        for entry in &self.screens {
            for (top_key, container) in entry {
                let Some(container) = container.as_object() else {
                    continue;
                };
                if let Some(child_key) = container.keys().next() {
                    return Some(format!("{top_key}:{child_key}"));
                }
            }
        }
        None
    }

    /// Base path and variant list for one screen, with defaulting.
    ///
    /// A missing or empty `path` falls back to `/screens/{top}/{child}`; a missing or
    /// empty `variants` list falls back to `["default"]`.
    pub fn variant_info(&self, screen_id: &str) -> Option<VariantInfo> {
        let node = self.variant_node(screen_id)?;
        let (top_key, child_key) = screen_id.split_once(':')?;

        let base_path = node
            .get("path")
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("/screens/{top_key}/{child_key}"));
        let base_path = base_path.trim_end_matches('/').to_owned();

        let variants: Vec<String> = node
            .get("variants")
            .and_then(Value::as_array)
            .map(|variants| {
                variants
                    .iter()
                    .filter_map(|variant| variant.as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        let variants = if variants.is_empty() {
            vec![DEFAULT_VARIANT.to_owned()]
        } else {
            variants
        };

        Some(VariantInfo { base_path, variants })
    }
}

#[cfg(test)]
mod tests;
