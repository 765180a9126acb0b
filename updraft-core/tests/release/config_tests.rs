// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for cache configuration
//!
//! Scenarios:
//! - Private-repo mode needs a base URL
//! - Invalid configuration fails before any network call

use std::sync::Arc;
use std::time::Duration;

use updraft_core::{CacheConfig, CacheError, MockReleaseSource, ReleaseCache};

#[test]
fn test_config_custom_interval() {
    let config = CacheConfig::builder("a", "b")
        .interval_minutes(5)
        .build()
        .unwrap();

    assert_eq!(config.interval(), Duration::from_secs(300));
}

#[test]
fn test_config_custom_api_url() {
    let config = CacheConfig::builder("a", "b")
        .api_url("https://ghe.example.com/api/v3/")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    assert_eq!(config.api_url(), "https://ghe.example.com/api/v3");
    assert_eq!(config.timeout(), Duration::from_secs(5));
}

#[tokio::test]
async fn test_token_without_base_url_fails_before_network() {
    let source = Arc::new(MockReleaseSource::new());

    let cache = CacheConfig::builder("a", "b")
        .token("secret")
        .build()
        .map(|config| ReleaseCache::with_source(config, source.clone()));

    assert!(matches!(cache, Err(CacheError::Configuration(_))));
    assert_eq!(source.list_calls(), 0);
}

#[tokio::test]
async fn test_valid_config_reaches_upstream_on_first_load() {
    let source = Arc::new(MockReleaseSource::new());

    let cache = CacheConfig::builder("a", "b")
        .token("secret")
        .base_url("https://updates.example.com")
        .build()
        .map(|config| ReleaseCache::with_source(config, source.clone()))
        .unwrap();
    let _ = cache.load().await;

    assert_eq!(source.list_calls(), 1);
}

#[test]
fn test_missing_account_fails() {
    let result = CacheConfig::builder("", "b").build();
    assert!(matches!(result, Err(CacheError::Configuration(_))));
}

#[test]
fn test_cache_new_with_github_source() {
    let config = CacheConfig::builder("a", "b").build().unwrap();
    let cache = ReleaseCache::new(config).unwrap();

    assert_eq!(cache.config().account(), "a");
}
