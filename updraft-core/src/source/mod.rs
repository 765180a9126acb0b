// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Upstream Release Sources
//!
//! The fetcher talks to the release host through the [`ReleaseSource`]
//! trait so the cache can be driven by the real GitHub client or by a
//! scripted in-memory source in tests.

mod github;
mod mock;

pub use github::GithubSource;
pub use mock::MockReleaseSource;

use async_trait::async_trait;

use crate::error::CacheResult;
use crate::types::UpstreamRelease;

/// Access to an upstream release host.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Lists releases of `account/repository`, newest first, in upstream order.
    ///
    /// Network failures and non-success statuses map to `CacheError::Upstream`.
    async fn list_releases(
        &self,
        account: &str,
        repository: &str,
    ) -> CacheResult<Vec<UpstreamRelease>>;

    /// Downloads a text asset (the update manifest) from its download URL.
    async fn fetch_text(&self, url: &str) -> CacheResult<String>;

    /// Resolves an asset API URL to a short-lived direct download location.
    ///
    /// Used in private-repo mode, where public download URLs are not reachable
    /// without credentials.
    async fn resolve_download(&self, api_url: &str) -> CacheResult<String>;
}
