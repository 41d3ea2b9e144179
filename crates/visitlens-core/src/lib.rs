//! visitlens core: in-process spans, labeled counters, and the Prometheus text
//! exposition encoder.
//!
//! This crate carries no transport or runtime dependencies. Everything here is
//! a short, synchronous, in-memory operation that is safe to call from any
//! number of request threads.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Contract violations surface as `VisitLensError` or are ignored, never as a
//! crash inside a request handler.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod trace;

/// Shared result type.
pub use error::{Result, VisitLensError};
