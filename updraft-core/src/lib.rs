// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Updraft Core Library
//!
//! Release cache for auto-update servers. Polls an upstream release host,
//! keeps the newest release in memory, classifies its assets by platform
//! and rewrites the `RELEASES` update manifest so package URLs resolve
//! against the asset host.
//!
//! # Example
//!
//! ```ignore
//! use updraft_core::{CacheConfig, ReleaseCache, Platform};
//!
//! let config = CacheConfig::builder("acme", "desktop-app").build()?;
//! let cache = ReleaseCache::new(config)?;
//!
//! let latest = cache.load().await?;
//! if let Some(asset) = latest.asset(Platform::Macos) {
//!     println!("{} -> {}", latest.version, asset.url);
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod platform;
pub mod source;
pub mod types;

pub use cache::ReleaseCache;
pub use config::{CacheConfig, CacheConfigBuilder, DEFAULT_API_URL, DEFAULT_INTERVAL_MINUTES};
pub use error::{CacheError, CacheResult};
pub use fetcher::{select_release, FetchOutcome, ManifestRetry, ReleaseFetcher};
pub use manifest::{package_references, rewrite_manifest, MANIFEST_FILE_NAME};
pub use platform::{classify, Platform, UnknownPlatform};
pub use source::{GithubSource, MockReleaseSource, ReleaseSource};
pub use types::{size_in_megabytes, AssetInfo, ReleaseSnapshot, UpstreamAsset, UpstreamRelease};
