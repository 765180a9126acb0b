// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release type definitions
//!
//! Upstream wire types (as returned by the GitHub releases API) and the
//! normalized snapshot the cache serves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::platform::Platform;

/// A release object from the upstream release list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRelease {
    /// Version tag (e.g. `"v1.2.0"`).
    pub tag_name: String,
    /// Release notes (may be absent).
    #[serde(default)]
    pub body: Option<String>,
    /// Publish time; absent for drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Unpublished draft.
    #[serde(default)]
    pub draft: bool,
    /// Flagged as not production-ready.
    #[serde(default)]
    pub prerelease: bool,
    /// Attached assets.
    #[serde(default)]
    pub assets: Vec<UpstreamAsset>,
}

/// A single downloadable asset of an upstream release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamAsset {
    /// File name.
    pub name: String,
    /// Public download URL.
    pub browser_download_url: String,
    /// API URL of the asset (used for authenticated downloads).
    pub url: String,
    /// MIME type reported upstream.
    #[serde(default)]
    pub content_type: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Download metadata for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// File name of the asset.
    pub name: String,
    /// Public download URL.
    pub url: String,
    /// API URL of the asset.
    pub api_url: String,
    /// MIME type.
    pub content_type: String,
    /// Size in megabytes, rounded to one decimal.
    pub size: f64,
}

impl AssetInfo {
    /// Builds asset info from an upstream asset.
    pub fn from_upstream(asset: &UpstreamAsset) -> Self {
        Self {
            name: asset.name.clone(),
            url: asset.browser_download_url.clone(),
            api_url: asset.url.clone(),
            content_type: asset.content_type.clone(),
            size: size_in_megabytes(asset.size),
        }
    }
}

/// Converts bytes to megabytes (10^6), rounded to one decimal.
pub fn size_in_megabytes(bytes: u64) -> f64 {
    (bytes as f64 / 1_000_000.0 * 10.0).round() / 10.0
}

/// The cached view of the latest release.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReleaseSnapshot {
    /// Version tag of the release.
    pub version: String,
    /// Release notes.
    pub notes: String,
    /// Publish time.
    pub pub_date: Option<DateTime<Utc>>,
    /// Downloadable assets keyed by platform.
    pub platforms: BTreeMap<Platform, AssetInfo>,
    /// Rewritten `RELEASES` manifest, if the release carried a usable one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

impl ReleaseSnapshot {
    /// Asset for a platform, if the release has one.
    pub fn asset(&self, platform: Platform) -> Option<&AssetInfo> {
        self.platforms.get(&platform)
    }
}
