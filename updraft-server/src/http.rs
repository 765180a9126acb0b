//! HTTP Server for Update Endpoints
//!
//! Serves the cached release to auto-update clients.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};
use updraft_core::{CacheError, Platform, ReleaseCache, ReleaseSnapshot};

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub cache: Arc<ReleaseCache>,
    pub start_time: Instant,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Update check response for clients that are behind.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub name: String,
    pub notes: String,
    pub pub_date: Option<String>,
    pub url: String,
}

#[derive(Serialize)]
struct OverviewAsset {
    name: String,
    size: f64,
    url: String,
}

#[derive(Serialize)]
struct OverviewResponse {
    account: String,
    repository: String,
    version: String,
    pub_date: Option<String>,
    platforms: BTreeMap<Platform, OverviewAsset>,
}

/// Creates the HTTP router.
pub fn create_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(overview_handler))
        .route("/health", get(health_handler))
        .route("/download/:platform", get(download_handler))
        .route("/update/:platform/:version", get(update_handler))
        .route("/update/:platform/:version/RELEASES", get(manifest_handler))
        .with_state(state)
}

fn error_response(err: &CacheError) -> Response {
    error!(error = %err, "failed to load release");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn pub_date(snapshot: &ReleaseSnapshot) -> Option<String> {
    snapshot.pub_date.map(|d| d.to_rfc3339())
}

fn parse_version(version: &str) -> Option<semver::Version> {
    semver::Version::parse(version.trim_start_matches('v')).ok()
}

/// Root handler - latest release overview.
async fn overview_handler(State(state): State<HttpState>) -> Response {
    let snapshot = match state.cache.load().await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    let config = state.cache.config();

    let platforms = snapshot
        .platforms
        .iter()
        .map(|(platform, asset)| {
            (
                *platform,
                OverviewAsset {
                    name: asset.name.clone(),
                    size: asset.size,
                    url: asset.url.clone(),
                },
            )
        })
        .collect();

    Json(OverviewResponse {
        account: config.account().to_string(),
        repository: config.repository().to_string(),
        version: snapshot.version.clone(),
        pub_date: pub_date(&snapshot),
        platforms,
    })
    .into_response()
}

/// Health check endpoint - always returns 200 if server is running.
async fn health_handler(State(state): State<HttpState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Redirects to the asset for a platform.
async fn download_handler(
    State(state): State<HttpState>,
    Path(platform): Path<String>,
) -> Response {
    let Ok(platform) = platform.parse::<Platform>() else {
        return not_found("unknown platform");
    };

    let snapshot = match state.cache.load().await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let Some(asset) = snapshot.asset(platform) else {
        return not_found("no download available for this platform");
    };

    if !state.cache.config().is_private() {
        return redirect(&asset.url);
    }

    match state.cache.source().resolve_download(&asset.api_url).await {
        Ok(location) => redirect(&location),
        Err(e) => error_response(&e),
    }
}

/// Update check: 200 with update details when the client is behind, else 204.
async fn update_handler(
    State(state): State<HttpState>,
    Path((platform, version)): Path<(String, String)>,
) -> Response {
    let Ok(platform) = platform.parse::<Platform>() else {
        return not_found("unknown platform");
    };

    let Some(client_version) = parse_version(&version) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "invalid version" })),
        )
            .into_response();
    };

    let snapshot = match state.cache.load().await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    let Some(latest) = parse_version(&snapshot.version) else {
        warn!(version = %snapshot.version, "latest release tag is not semver");
        return StatusCode::NO_CONTENT.into_response();
    };

    if latest <= client_version {
        return StatusCode::NO_CONTENT.into_response();
    }

    let Some(asset) = snapshot.asset(platform) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let config = state.cache.config();
    let url = match config.base_url().filter(|_| config.is_private()) {
        Some(base) => format!("{}/download/{}?update=true", base, platform),
        None => asset.url.clone(),
    };

    Json(UpdateResponse {
        name: snapshot.version.clone(),
        notes: snapshot.notes.clone(),
        pub_date: pub_date(&snapshot),
        url,
    })
    .into_response()
}

/// Serves the rewritten `RELEASES` manifest to Windows clients.
async fn manifest_handler(
    State(state): State<HttpState>,
    Path((platform, _version)): Path<(String, String)>,
) -> Response {
    match platform.parse::<Platform>() {
        Ok(p) if p.is_windows() => {}
        _ => return not_found("manifest is only served for windows"),
    }

    let snapshot = match state.cache.load().await {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };

    match snapshot.manifest {
        Some(manifest) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            manifest,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
