//! Updraft Update Server
//!
//! Serves the latest upstream release to auto-update clients.
//! Provides:
//! - Download redirects per platform
//! - Update checks for Electron/Squirrel clients
//! - The rewritten `RELEASES` manifest for Windows delta updates

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use updraft_server::build_app;
use updraft_server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("updraft_server=info".parse()?)
                .add_directive("updraft_core=info".parse()?),
        )
        .init();

    // Load configuration
    let config = ServerConfig::from_env().context("invalid configuration")?;
    info!("Starting Updraft Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Serving releases of {}/{} (private: {}, prereleases: {})",
        config.account,
        config.repository,
        config.token.is_some(),
        config.serve_prereleases
    );

    let app = build_app(&config).context("failed to initialize release cache")?;

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!("HTTP server listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
