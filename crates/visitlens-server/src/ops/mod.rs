//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness (not counted as a visit)
//! - `/metrics` : Prometheus text format

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::app_state::AppState;
use crate::handlers::{request_span, respond_ok};

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Response {
    let started = Instant::now();
    let mut span = request_span(&state, "handle_metrics_request", "/metrics", remote);

    state.visits().record_visit("/metrics");
    tracing::info!(%remote, path = "/metrics", "visit");
    let body = state.visits().render_metrics();

    respond_ok(&mut span, started);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
