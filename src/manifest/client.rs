// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde_json::Value;

use super::{Manifest, VariantInfo};

/// Default base for a host application's own dev server.
pub const LOCAL_BASE_DEFAULT: &str = "http://127.0.0.1:4000";
/// Default base for the published screen-context CDN.
pub const CDN_BASE_DEFAULT: &str = "https://cdn.screen-contexts.dev/v1";

const MANIFEST_PATH: &str = "/manifest.json";

#[derive(Debug)]
pub enum ManifestError {
    Network {
        url: String,
        source: reqwest::Error,
    },
    Http {
        url: String,
        status: u16,
    },
    Json {
        url: String,
        source: serde_json::Error,
    },
    InvalidShape,
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { url, source } => write!(f, "request to {url} failed: {source}"),
            Self::Http { url, status } => write!(f, "HTTP {status} from {url}"),
            Self::Json { url, source } => write!(f, "invalid JSON from {url}: {source}"),
            Self::InvalidShape => f.write_str("Invalid manifest shape"),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Http { .. } | Self::InvalidShape => None,
        }
    }
}

/// Fetches manifests and variant payloads from the local dev server or the CDN.
///
/// Which base a request resolves against depends only on the data-source string: any
/// source whose name contains "local" (case-insensitive) goes to the local base, everything
/// else to the CDN base. One request per call, no retry, caches bypassed.
#[derive(Debug, Clone)]
pub struct ManifestClient {
    http: reqwest::Client,
    local_base: String,
    cdn_base: String,
}

impl ManifestClient {
    pub fn new() -> Self {
        Self::with_bases(LOCAL_BASE_DEFAULT, CDN_BASE_DEFAULT)
    }

    pub fn with_bases(local_base: impl Into<String>, cdn_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            local_base: trim_base(local_base.into()),
            cdn_base: trim_base(cdn_base.into()),
        }
    }

    pub fn local_base(&self) -> &str {
        &self.local_base
    }

    pub fn cdn_base(&self) -> &str {
        &self.cdn_base
    }

    fn is_local(data_source: &str) -> bool {
        data_source.to_lowercase().contains("local")
    }

    fn resolve(&self, data_source: &str, file_path: &str) -> String {
        let base = if Self::is_local(data_source) { &self.local_base } else { &self.cdn_base };
        if file_path.starts_with('/') {
            format!("{base}{file_path}")
        } else {
            format!("{base}/{file_path}")
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, ManifestError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|source| ManifestError::Network {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ManifestError::Network {
            url: url.to_owned(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| ManifestError::Json {
            url: url.to_owned(),
            source,
        })
    }

    /// Fetches and shape-checks the manifest for the given data source.
    pub async fn fetch_manifest(&self, data_source: &str) -> Result<Manifest, ManifestError> {
        let url = self.resolve(data_source, MANIFEST_PATH);
        let body = self.get_json(&url).await?;
        Manifest::from_value(&body).ok_or(ManifestError::InvalidShape)
    }

    /// Fetches one variant payload: `{base_path}/{variant}.json` under the same base the
    /// manifest came from. Callers treat any error as "no preview available".
    pub async fn fetch_variant(
        &self,
        data_source: &str,
        info: &VariantInfo,
        variant: &str,
    ) -> Result<Value, ManifestError> {
        let file_path = format!("{}/{variant}.json", info.base_path);
        let url = self.resolve(data_source, &file_path);
        self.get_json(&url).await
    }
}

impl Default for ManifestClient {
    fn default() -> Self {
        Self::new()
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_owned()
}
