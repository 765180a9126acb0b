// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration for the release cache

use std::time::Duration;

use crate::error::{CacheError, CacheResult};

/// Default refresh interval in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 15;

/// Default upstream API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Validated, immutable cache configuration.
///
/// Build with [`CacheConfig::builder`]; `build()` enforces that account and
/// repository are set and that a token always comes with a base URL.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    account: String,
    repository: String,
    token: Option<String>,
    base_url: Option<String>,
    serve_prereleases: bool,
    interval: Duration,
    api_url: String,
    timeout: Duration,
    user_agent: String,
}

impl CacheConfig {
    /// Starts a builder for `account/repository`.
    pub fn builder(account: impl Into<String>, repository: impl Into<String>) -> CacheConfigBuilder {
        CacheConfigBuilder {
            account: account.into(),
            repository: repository.into(),
            token: None,
            base_url: None,
            serve_prereleases: false,
            interval: Some(Duration::from_secs(DEFAULT_INTERVAL_MINUTES * 60)),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!(
                "Updraft/{}",
                option_env!("CARGO_PKG_VERSION").unwrap_or("0.1.0")
            ),
        }
    }

    /// Upstream account (owner).
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Upstream repository name.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Bearer credential for private repositories.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Public base URL of this server (required in private mode).
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Whether prereleases may be served.
    pub fn serve_prereleases(&self) -> bool {
        self.serve_prereleases
    }

    /// Maximum age of the cached snapshot.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Upstream API root.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// HTTP timeout for upstream requests.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// User agent sent upstream.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// True when a token is configured.
    pub fn is_private(&self) -> bool {
        self.token.is_some()
    }
}

/// Builder for [`CacheConfig`].
#[derive(Debug, Clone)]
pub struct CacheConfigBuilder {
    account: String,
    repository: String,
    token: Option<String>,
    base_url: Option<String>,
    serve_prereleases: bool,
    // None when the requested interval does not fit in a Duration.
    interval: Option<Duration>,
    api_url: String,
    timeout: Duration,
    user_agent: String,
}

impl CacheConfigBuilder {
    /// Enables private-repo mode with a bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the public base URL of this server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Serve prereleases as well as stable releases.
    pub fn serve_prereleases(mut self, serve: bool) -> Self {
        self.serve_prereleases = serve;
        self
    }

    /// Sets the refresh interval in minutes.
    pub fn interval_minutes(mut self, minutes: u64) -> Self {
        self.interval = minutes.checked_mul(60).map(Duration::from_secs);
        self
    }

    /// Sets the refresh interval directly.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Overrides the upstream API root (e.g. GitHub Enterprise).
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the HTTP timeout for upstream requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> CacheResult<CacheConfig> {
        let token = self.token.filter(|t| !t.is_empty());
        let base_url = self
            .base_url
            .filter(|u| !u.is_empty())
            .map(|u| u.trim_end_matches('/').to_string());

        if self.account.is_empty() || self.repository.is_empty() {
            return Err(CacheError::Configuration(
                "neither account nor repository are defined".into(),
            ));
        }

        if token.is_some() && base_url.is_none() {
            return Err(CacheError::Configuration(
                "base URL not defined, mandatory for private repo mode".into(),
            ));
        }

        let interval = self
            .interval
            .ok_or_else(|| CacheError::Configuration("invalid interval".into()))?;

        Ok(CacheConfig {
            account: self.account,
            repository: self.repository,
            token,
            base_url,
            serve_prereleases: self.serve_prereleases,
            interval,
            api_url: self.api_url.trim_end_matches('/').to_string(),
            timeout: self.timeout,
            user_agent: self.user_agent,
        })
    }
}
