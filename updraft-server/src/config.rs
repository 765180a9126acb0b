//! Server configuration
//!
//! Loaded from environment variables:
//! - `PORT` (default 8000)
//! - `ACCOUNT`, `REPOSITORY` (required)
//! - `TOKEN` (enables private-repo mode), `URL` (public base URL, required with `TOKEN`)
//! - `INTERVAL` (refresh interval in minutes, default 15)
//! - `PRE` / `SERVE_PRERELEASES` (`1` or `true` to serve prereleases)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use updraft_core::{CacheConfig, CacheError, CacheResult, DEFAULT_INTERVAL_MINUTES};

const DEFAULT_PORT: u16 = 8000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Upstream account.
    pub account: String,
    /// Upstream repository.
    pub repository: String,
    /// Bearer token for private repositories.
    pub token: Option<String>,
    /// Public base URL of this server.
    pub base_url: Option<String>,
    /// Refresh interval in minutes.
    pub interval_minutes: u64,
    /// Serve prereleases.
    pub serve_prereleases: bool,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> CacheResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CacheResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| CacheError::Configuration(format!("invalid PORT: {}", v)))?,
            None => DEFAULT_PORT,
        };

        let interval_minutes = match get("INTERVAL") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| CacheError::Configuration(format!("invalid INTERVAL: {}", v)))?,
            None => DEFAULT_INTERVAL_MINUTES,
        };

        let serve_prereleases = get("PRE")
            .or_else(|| get("SERVE_PRERELEASES"))
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Ok(Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port),
            account: get("ACCOUNT").unwrap_or_default(),
            repository: get("REPOSITORY").unwrap_or_default(),
            token: get("TOKEN"),
            base_url: get("URL"),
            interval_minutes,
            serve_prereleases,
        })
    }

    /// Builds and validates the cache configuration.
    pub fn cache_config(&self) -> CacheResult<CacheConfig> {
        let mut builder = CacheConfig::builder(&self.account, &self.repository)
            .interval_minutes(self.interval_minutes)
            .serve_prereleases(self.serve_prereleases);

        if let Some(token) = &self.token {
            builder = builder.token(token);
        }
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
