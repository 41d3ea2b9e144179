//! Visit endpoints: `/`, `/stats`, `/traces`.
//!
//! Every counted request runs inside a span carrying `http.method`,
//! `http.path`, `http.remote_ip`, `http.response_time_ms` and
//! `http.status_code`. The span finishes when the handler returns.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, State};
use axum::Json;
use serde::Serialize;
use visitlens_core::trace::{Span, SpanRecord};

use crate::app_state::AppState;
use crate::visits::VisitSnapshot;

const TRACES_NOTE: &str = "Spans are recorded in-process only. Finished spans are \
    written by the configured exporter (lines starting with [OTEL] on stdout by default); \
    the most recent ones are listed here.";

pub(crate) fn request_span(state: &AppState, name: &str, path: &str, remote: SocketAddr) -> Span {
    let mut span = state.tracer().start(name);
    span.set_attribute("http.method", "GET");
    span.set_attribute("http.path", path);
    span.set_attribute("http.remote_ip", remote.ip().to_string());
    span
}

pub(crate) fn respond_ok(span: &mut Span, started: Instant) {
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    span.set_attribute("http.response_time_ms", elapsed_ms);
    span.set_attribute("http.status_code", 200);
}

pub async fn root(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> String {
    let started = Instant::now();
    let mut span = request_span(&state, "handle_root_request", "/", remote);

    let total = state.visits().record_visit("/");
    tracing::info!(%remote, path = "/", total, "visit");

    respond_ok(&mut span, started);
    format!("This page has been visited {total} times.\n")
}

pub async fn stats(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Json<VisitSnapshot> {
    let started = Instant::now();
    let mut span = request_span(&state, "handle_stats_request", "/stats", remote);

    let total = state.visits().record_visit("/stats");
    tracing::info!(%remote, path = "/stats", total, "visit");
    let snapshot = state.visits().snapshot();

    respond_ok(&mut span, started);
    Json(snapshot)
}

#[derive(Debug, Serialize)]
pub struct TracesView {
    pub note: &'static str,
    /// Ring size; older spans are evicted first.
    pub capacity: usize,
    pub spans: Vec<SpanRecord>,
}

pub async fn traces(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
) -> Json<TracesView> {
    let mut span = request_span(&state, "handle_traces_request", "/traces", remote);

    let total = state.visits().record_visit("/traces");
    tracing::info!(%remote, path = "/traces", total, "visit");
    let spans = state.recent_spans().snapshot();

    span.set_attribute("http.status_code", 200);
    Json(TracesView {
        note: TRACES_NOTE,
        capacity: state.recent_spans().capacity(),
        spans,
    })
}
