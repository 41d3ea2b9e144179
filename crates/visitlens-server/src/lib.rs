//! visitlens server library entry.
//!
//! Wires the telemetry core into a small visit-counting HTTP service: config,
//! shared state, visit accounting, and the axum router. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod ops;
pub mod router;
pub mod visits;
