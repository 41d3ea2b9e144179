//! visitlens server.
//!
//! Usage: `visitlens-server [config.yaml]`. Without an argument the server reads
//! `visitlens.yaml` when present and otherwise runs on defaults.

use std::net::SocketAddr;
use std::path::Path;

use tracing_subscriber::{fmt, EnvFilter};

use visitlens_core::error::{Result, VisitLensError};
use visitlens_server::{app_state, config, router};

const DEFAULT_CONFIG: &str = "visitlens.yaml";

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "visitlens-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => config::load_from_file(DEFAULT_CONFIG)?,
        None => config::ServerConfig::default(),
    };
    let state = app_state::AppState::new(cfg)?;
    let listen = state.cfg().server.listen_addr()?;
    let app = router::build_router(state);

    tracing::info!(%listen, "visitlens-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| VisitLensError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| VisitLensError::Internal(format!("server failed: {e}")))?;

    tracing::info!("visitlens-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
