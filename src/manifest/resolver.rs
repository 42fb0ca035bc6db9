// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::client::ManifestError;
use super::{Manifest, ScreenOption, VariantInfo};

/// Identifies one fetch cycle. A ticket from a superseded cycle can no longer commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Loading/error state around the most recent manifest fetch.
///
/// The resolver never performs I/O itself. Callers obtain a ticket with [`begin`], run the
/// fetch, and hand the outcome to [`complete`]. Starting a new cycle invalidates every
/// earlier ticket, so a slow response that lost the race cannot overwrite fresher state.
///
/// [`begin`]: ManifestResolver::begin
/// [`complete`]: ManifestResolver::complete
#[derive(Debug, Default)]
pub struct ManifestResolver {
    manifest: Option<Manifest>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl ManifestResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether any fetch has succeeded so far this session.
    pub fn has_loaded(&self) -> bool {
        self.manifest.is_some()
    }

    /// Starts a fetch cycle: clears the error, raises `loading`, and returns the ticket
    /// the eventual outcome must present.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.generation)
    }

    /// Commits a fetch outcome. Returns false (and changes nothing) for stale tickets.
    ///
    /// On failure the previous manifest, if any, is retained; only the error surfaces.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Manifest, ManifestError>,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(manifest) => {
                self.manifest = Some(manifest);
            }
            Err(error) => {
                self.error = Some(error.to_string());
            }
        }
        true
    }

    pub fn screen_options(&self) -> Vec<ScreenOption> {
        self.manifest.as_ref().map(Manifest::screen_options).unwrap_or_default()
    }

    pub fn variant_info(&self, screen_id: &str) -> Option<VariantInfo> {
        self.manifest.as_ref()?.variant_info(screen_id)
    }
}
