// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for ReleaseFetcher
//!
//! Scenarios:
//! - Latest stable release is normalized into a snapshot
//! - Prereleases only when enabled
//! - Manifest download retries and failure tolerance

use std::sync::Arc;
use std::time::Duration;

use updraft_core::{
    CacheConfig, CacheError, FetchOutcome, ManifestRetry, MockReleaseSource, Platform,
    ReleaseFetcher,
};

use super::fixtures::{asset, config, manifest_asset, prerelease, release, MANIFEST_TEXT, MANIFEST_URL};

fn fetcher(source: &Arc<MockReleaseSource>) -> ReleaseFetcher {
    ReleaseFetcher::new(source.clone()).with_retry(ManifestRetry {
        attempts: 3,
        backoff: Duration::from_millis(10),
    })
}

fn updated(outcome: FetchOutcome) -> updraft_core::ReleaseSnapshot {
    match outcome {
        FetchOutcome::Updated(snapshot) => snapshot,
        other => panic!("expected updated snapshot, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_single_dmg_release() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![asset("App-1.0.0.dmg", 52_000_000)],
    )]));

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    assert_eq!(snapshot.version, "v1.0.0");
    assert_eq!(snapshot.notes, "Notes for v1.0.0");
    let mac = snapshot.asset(Platform::Macos).unwrap();
    assert_eq!(mac.name, "App-1.0.0.dmg");
    assert_eq!(mac.size, 52.0);
    assert_eq!(mac.url, "https://x/App-1.0.0.dmg");
    assert_eq!(mac.api_url, "https://api.x/assets/App-1.0.0.dmg");
    assert_eq!(snapshot.platforms.len(), 1);
    assert!(snapshot.manifest.is_none());
}

#[tokio::test]
async fn test_fetch_classifies_every_asset() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v2.0.0",
        vec![
            asset("App Setup 2.0.0.exe", 80_000_000),
            asset("App Setup 2.0.0-ia32.exe", 70_000_000),
            asset("App-2.0.0.AppImage", 90_000_000),
            asset("app_2.0.0_amd64.deb", 60_000_000),
            asset("latest.yml", 300),
            asset("App-2.0.0-mac.zip", 50_000_000),
        ],
    )]));

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    assert_eq!(snapshot.platforms.len(), 4);
    assert!(snapshot.asset(Platform::Windows64).is_some());
    assert!(snapshot.asset(Platform::Windows32).is_some());
    assert!(snapshot.asset(Platform::Linux).is_some());
    assert!(snapshot.asset(Platform::LinuxDeb).is_some());
    assert!(snapshot.asset(Platform::Macos).is_none());
}

#[tokio::test]
async fn test_fetch_last_asset_per_platform_wins() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![asset("App-1.0.0.dmg", 1_000_000), asset("App-1.0.0-arm64.dmg", 2_000_000)],
    )]));

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    assert_eq!(snapshot.asset(Platform::Macos).unwrap().name, "App-1.0.0-arm64.dmg");
}

#[tokio::test]
async fn test_fetch_prerelease_only_is_not_found() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![prerelease(
        "v2.0.0-beta.1",
        vec![asset("App.dmg", 1)],
    )]));

    let err = fetcher(&source).fetch_latest(&config(), None).await.unwrap_err();

    assert!(matches!(err, CacheError::NoReleaseFound { .. }));
}

#[tokio::test]
async fn test_fetch_prerelease_when_enabled() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![
        prerelease("v2.0.0-beta.1", vec![asset("App.dmg", 1)]),
        release("v1.0.0", vec![asset("App.dmg", 1)]),
    ]));
    let config = CacheConfig::builder("a", "b")
        .serve_prereleases(true)
        .build()
        .unwrap();

    let snapshot = updated(fetcher(&source).fetch_latest(&config, None).await.unwrap());

    assert_eq!(snapshot.version, "v2.0.0-beta.1");
}

#[tokio::test]
async fn test_fetch_empty_list_is_not_found() {
    let source = Arc::new(MockReleaseSource::new());

    let err = fetcher(&source).fetch_latest(&config(), None).await.unwrap_err();

    assert!(matches!(err, CacheError::NoReleaseFound { .. }));
}

#[tokio::test]
async fn test_fetch_same_version_short_circuits() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![manifest_asset()],
    )]));
    source.set_text(MANIFEST_URL, MANIFEST_TEXT);

    let outcome = fetcher(&source)
        .fetch_latest(&config(), Some("v1.0.0"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        FetchOutcome::Unchanged {
            version: "v1.0.0".into()
        }
    );
    // Assets are not reprocessed
    assert_eq!(source.text_calls(), 0);
}

#[tokio::test]
async fn test_fetch_rewrites_manifest() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![manifest_asset(), asset("App Setup 1.0.0.exe", 1)],
    )]));
    source.set_text(MANIFEST_URL, MANIFEST_TEXT);

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    let manifest = snapshot.manifest.unwrap();
    assert!(manifest.contains("https://github.com/a/b/releases/download/v1.0.0/App-1.0.0-full.nupkg"));
    assert!(snapshot.platforms.contains_key(&Platform::Windows64));
}

#[tokio::test]
async fn test_fetch_manifest_retried_until_success() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![manifest_asset()],
    )]));
    source.set_text(MANIFEST_URL, MANIFEST_TEXT);
    source.fail_text(MANIFEST_URL, 2);

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    assert_eq!(source.text_calls(), 3);
    assert!(snapshot.manifest.is_some());
}

#[tokio::test]
async fn test_fetch_manifest_failure_is_not_fatal() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![manifest_asset(), asset("App-1.0.0.dmg", 1_000_000)],
    )]));
    source.fail_text(MANIFEST_URL, 10);

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    // Three attempts, then the manifest is dropped for this cycle
    assert_eq!(source.text_calls(), 3);
    assert!(snapshot.manifest.is_none());
    assert!(snapshot.asset(Platform::Macos).is_some());
}

#[tokio::test]
async fn test_fetch_manifest_without_packages_is_dropped() {
    let source = Arc::new(MockReleaseSource::with_releases(vec![release(
        "v1.0.0",
        vec![manifest_asset(), asset("App-1.0.0.dmg", 1_000_000)],
    )]));
    source.set_text(MANIFEST_URL, "nothing to see here");

    let snapshot = updated(fetcher(&source).fetch_latest(&config(), None).await.unwrap());

    assert_eq!(source.text_calls(), 1);
    assert!(snapshot.manifest.is_none());
    assert_eq!(snapshot.platforms.len(), 1);
}

#[tokio::test]
async fn test_fetch_upstream_error() {
    let source = Arc::new(MockReleaseSource::new());
    source.set_list_failure(Some("HTTP 502"));

    let err = fetcher(&source).fetch_latest(&config(), None).await.unwrap_err();

    assert!(matches!(err, CacheError::Upstream { step: "listing releases", .. }));
}
