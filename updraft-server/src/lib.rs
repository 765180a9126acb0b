pub mod config;
pub mod http;

use std::sync::Arc;
use std::time::Instant;

use config::ServerConfig;
use http::{create_router, HttpState};
use updraft_core::{CacheResult, ReleaseCache};

/// Builds the router for a server configuration, backed by the GitHub source.
pub fn build_app(config: &ServerConfig) -> CacheResult<axum::Router> {
    let cache = ReleaseCache::new(config.cache_config()?)?;
    Ok(create_router(HttpState {
        cache: Arc::new(cache),
        start_time: Instant::now(),
    }))
}
