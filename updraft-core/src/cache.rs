// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release Cache
//!
//! In-memory store for the latest [`ReleaseSnapshot`]. The cache starts empty
//! and is populated lazily: [`ReleaseCache::load`] refreshes whenever the
//! snapshot is older than the configured interval and then hands out a copy.
//!
//! Refreshes are serialized; the snapshot and its timestamp are published
//! together under one write lock, so readers never see a half-built release.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::fetcher::{FetchOutcome, ManifestRetry, ReleaseFetcher};
use crate::source::{GithubSource, ReleaseSource};
use crate::types::ReleaseSnapshot;

#[derive(Default)]
struct CacheState {
    latest: Option<ReleaseSnapshot>,
    last_update: Option<Instant>,
}

/// Lazily refreshed cache of the latest upstream release.
pub struct ReleaseCache {
    config: CacheConfig,
    fetcher: ReleaseFetcher,
    state: RwLock<CacheState>,
    refresh_lock: Mutex<()>,
}

impl ReleaseCache {
    /// Creates a cache backed by the GitHub releases API.
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        let source = Arc::new(GithubSource::new(&config)?);
        Ok(Self::with_source(config, source))
    }

    /// Creates a cache backed by a custom release source.
    pub fn with_source(config: CacheConfig, source: Arc<dyn ReleaseSource>) -> Self {
        Self {
            config,
            fetcher: ReleaseFetcher::new(source),
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Overrides the manifest download retry policy.
    pub fn with_manifest_retry(mut self, retry: ManifestRetry) -> Self {
        self.fetcher = self.fetcher.with_retry(retry);
        self
    }

    /// The cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The release source used for refreshes.
    pub fn source(&self) -> &Arc<dyn ReleaseSource> {
        self.fetcher.source()
    }

    /// Time of the last successful refresh, if any.
    pub async fn last_update(&self) -> Option<Instant> {
        self.state.read().await.last_update
    }

    /// Whether a snapshot has been cached.
    pub async fn is_populated(&self) -> bool {
        self.state.read().await.latest.is_some()
    }

    /// Whether the cache needs a refresh now.
    pub async fn is_outdated(&self) -> bool {
        self.is_outdated_at(Instant::now()).await
    }

    /// Whether the cache needs a refresh at `now`.
    ///
    /// True if never refreshed, or if more than the interval has elapsed.
    pub async fn is_outdated_at(&self, now: Instant) -> bool {
        match self.state.read().await.last_update {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.config.interval(),
        }
    }

    /// Returns a copy of the cached snapshot, refreshing first if outdated.
    ///
    /// When upstream has no qualifying release but a previous snapshot exists,
    /// the previous snapshot is returned and the next call retries.
    pub async fn load(&self) -> CacheResult<ReleaseSnapshot> {
        if self.is_outdated().await {
            if let Err(e) = self.refresh_if_outdated().await {
                let keep_previous =
                    matches!(e, CacheError::NoReleaseFound { .. }) && self.is_populated().await;
                if !keep_previous {
                    return Err(e);
                }
                warn!(error = %e, "serving previous snapshot");
            }
        }

        self.state
            .read()
            .await
            .latest
            .clone()
            .ok_or_else(|| CacheError::NoReleaseFound {
                account: self.config.account().to_string(),
                repository: self.config.repository().to_string(),
            })
    }

    /// Forces a refresh regardless of staleness.
    pub async fn refresh(&self) -> CacheResult<()> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_if_outdated(&self) -> CacheResult<()> {
        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited.
        if !self.is_outdated().await {
            return Ok(());
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> CacheResult<()> {
        let account = self.config.account();
        let repository = self.config.repository();
        let current_version = self
            .state
            .read()
            .await
            .latest
            .as_ref()
            .map(|s| s.version.clone());

        info!(
            account,
            repository,
            private = self.config.is_private(),
            "refreshing cache"
        );

        match self
            .fetcher
            .fetch_latest(&self.config, current_version.as_deref())
            .await
        {
            Ok(FetchOutcome::Updated(snapshot)) => {
                let mut state = self.state.write().await;
                state.latest = Some(snapshot);
                state.last_update = Some(Instant::now());
                Ok(())
            }
            Ok(FetchOutcome::Unchanged { .. }) => {
                self.state.write().await.last_update = Some(Instant::now());
                Ok(())
            }
            Err(e @ CacheError::NoReleaseFound { .. }) => {
                warn!(account, repository, step = "selecting release", "no release found");
                Err(e)
            }
            Err(e) => {
                error!(account, repository, step = "refreshing cache", error = %e, "refresh failed");
                Err(e)
            }
        }
    }
}
