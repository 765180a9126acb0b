// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted in-memory release source for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::ReleaseSource;
use crate::error::{CacheError, CacheResult};
use crate::types::UpstreamRelease;

#[derive(Default)]
struct MockState {
    releases: Vec<UpstreamRelease>,
    list_failure: Option<String>,
    texts: HashMap<String, String>,
    text_failures: HashMap<String, usize>,
    redirects: HashMap<String, String>,
}

/// In-memory [`ReleaseSource`] that serves scripted responses and counts calls.
#[derive(Default)]
pub struct MockReleaseSource {
    state: Mutex<MockState>,
    list_calls: AtomicUsize,
    text_calls: AtomicUsize,
}

impl MockReleaseSource {
    /// Creates an empty source (lists no releases).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source listing the given releases.
    pub fn with_releases(releases: Vec<UpstreamRelease>) -> Self {
        let source = Self::new();
        source.set_releases(releases);
        source
    }

    /// Replaces the release list.
    pub fn set_releases(&self, releases: Vec<UpstreamRelease>) {
        self.lock().releases = releases;
    }

    /// Makes listing fail until cleared with `None`.
    pub fn set_list_failure(&self, message: Option<&str>) {
        self.lock().list_failure = message.map(str::to_string);
    }

    /// Serves `text` for downloads of `url`.
    pub fn set_text(&self, url: &str, text: &str) {
        self.lock().texts.insert(url.to_string(), text.to_string());
    }

    /// Makes the next `times` downloads of `url` fail.
    pub fn fail_text(&self, url: &str, times: usize) {
        self.lock().text_failures.insert(url.to_string(), times);
    }

    /// Resolves `api_url` to `location`.
    pub fn set_redirect(&self, api_url: &str, location: &str) {
        self.lock()
            .redirects
            .insert(api_url.to_string(), location.to_string());
    }

    /// Number of release list requests made.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of text downloads attempted.
    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    async fn list_releases(
        &self,
        _account: &str,
        _repository: &str,
    ) -> CacheResult<Vec<UpstreamRelease>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        match &state.list_failure {
            Some(message) => Err(CacheError::upstream("listing releases", message.clone())),
            None => Ok(state.releases.clone()),
        }
    }

    async fn fetch_text(&self, url: &str) -> CacheResult<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();

        if let Some(remaining) = state.text_failures.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CacheError::upstream("fetching manifest", "HTTP 503"));
            }
        }

        state
            .texts
            .get(url)
            .cloned()
            .ok_or_else(|| CacheError::upstream("fetching manifest", format!("HTTP 404 from {}", url)))
    }

    async fn resolve_download(&self, api_url: &str) -> CacheResult<String> {
        self.lock()
            .redirects
            .get(api_url)
            .cloned()
            .ok_or_else(|| CacheError::upstream("resolving download", "HTTP 404"))
    }
}
