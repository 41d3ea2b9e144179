//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{app_state::AppState, handlers, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/stats", get(handlers::stats))
        .route("/metrics", get(ops::metrics))
        .route("/traces", get(handlers::traces))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
