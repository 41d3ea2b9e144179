//! Top-level facade crate for visitlens.
//!
//! Re-exports the telemetry core and the visit server so users can depend on a single crate.

pub mod core {
    pub use visitlens_core::*;
}

pub mod server {
    pub use visitlens_server::*;
}
