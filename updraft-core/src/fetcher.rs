// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release Fetcher
//!
//! Lists upstream releases, picks the one to serve and normalizes it into a
//! [`ReleaseSnapshot`]:
//! - The `RELEASES` manifest is downloaded (with bounded retry) and rewritten
//! - Every other asset is classified by platform; unclassified assets are skipped
//!
//! A failing manifest does not fail the refresh; the snapshot is published
//! without one.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::manifest::{rewrite_manifest, MANIFEST_FILE_NAME};
use crate::platform::classify;
use crate::source::ReleaseSource;
use crate::types::{AssetInfo, ReleaseSnapshot, UpstreamAsset, UpstreamRelease};

/// Retry policy for the manifest download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestRetry {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for ManifestRetry {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Result of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The selected release matches the cached version; nothing was reprocessed.
    Unchanged {
        /// The unchanged version tag.
        version: String,
    },
    /// A new snapshot was built.
    Updated(ReleaseSnapshot),
}

/// Picks the first release that is not a draft and, unless prereleases are
/// served, not a prerelease. Upstream order is preserved.
pub fn select_release(
    releases: &[UpstreamRelease],
    serve_prereleases: bool,
) -> Option<&UpstreamRelease> {
    releases
        .iter()
        .find(|r| !r.draft && (!r.prerelease || serve_prereleases))
}

/// Fetches and normalizes the latest release from a [`ReleaseSource`].
#[derive(Clone)]
pub struct ReleaseFetcher {
    source: Arc<dyn ReleaseSource>,
    retry: ManifestRetry,
}

impl ReleaseFetcher {
    /// Creates a fetcher with the default manifest retry policy.
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self {
            source,
            retry: ManifestRetry::default(),
        }
    }

    /// Overrides the manifest retry policy.
    pub fn with_retry(mut self, retry: ManifestRetry) -> Self {
        self.retry = retry;
        self
    }

    /// The underlying release source.
    pub fn source(&self) -> &Arc<dyn ReleaseSource> {
        &self.source
    }

    /// Fetches the latest qualifying release.
    ///
    /// Returns [`FetchOutcome::Unchanged`] when its tag equals `current_version`.
    pub async fn fetch_latest(
        &self,
        config: &CacheConfig,
        current_version: Option<&str>,
    ) -> CacheResult<FetchOutcome> {
        let releases = self
            .source
            .list_releases(config.account(), config.repository())
            .await?;

        let release = select_release(&releases, config.serve_prereleases()).ok_or_else(|| {
            CacheError::NoReleaseFound {
                account: config.account().to_string(),
                repository: config.repository().to_string(),
            }
        })?;

        if current_version == Some(release.tag_name.as_str()) {
            debug!(version = %release.tag_name, "cached version is the same as latest");
            return Ok(FetchOutcome::Unchanged {
                version: release.tag_name.clone(),
            });
        }

        info!(
            account = config.account(),
            repository = config.repository(),
            version = %release.tag_name,
            "caching version"
        );

        let snapshot = self.build_snapshot(config, release).await;

        info!(
            version = %snapshot.version,
            platforms = snapshot.platforms.len(),
            manifest = snapshot.manifest.is_some(),
            "finished caching version"
        );

        Ok(FetchOutcome::Updated(snapshot))
    }

    async fn build_snapshot(&self, config: &CacheConfig, release: &UpstreamRelease) -> ReleaseSnapshot {
        let mut snapshot = ReleaseSnapshot {
            version: release.tag_name.clone(),
            notes: release.body.clone().unwrap_or_default(),
            pub_date: release.published_at,
            ..Default::default()
        };

        for asset in &release.assets {
            if asset.name == MANIFEST_FILE_NAME {
                match self.cache_manifest(asset).await {
                    Ok(text) => snapshot.manifest = Some(text),
                    Err(e) => error!(
                        account = config.account(),
                        repository = config.repository(),
                        step = "caching manifest",
                        error = %e,
                        "manifest skipped for this refresh"
                    ),
                }
                continue;
            }

            let Some(platform) = classify(&asset.name) else {
                debug!(asset = %asset.name, "skipping unclassified asset");
                continue;
            };

            snapshot
                .platforms
                .insert(platform, AssetInfo::from_upstream(asset));
        }

        snapshot
    }

    async fn cache_manifest(&self, asset: &UpstreamAsset) -> CacheResult<String> {
        let url = &asset.browser_download_url;
        let text = self.fetch_with_retry(url).await?;
        rewrite_manifest(&text, url)
    }

    async fn fetch_with_retry(&self, url: &str) -> CacheResult<String> {
        let attempts = self.retry.attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.source.fetch_text(url).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < attempts => {
                    debug!(attempt, error = %e, "manifest download failed, retrying");
                    tokio::time::sleep(self.retry.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
