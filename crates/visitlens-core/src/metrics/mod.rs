//! Labeled counters and their Prometheus text exposition.
//!
//! Counters are stored as atomics keyed by a canonical [`LabelKey`] in a
//! `DashMap`, so unrelated label combinations never contend on one lock.
//! Rendering copies values out first and formats afterwards.

pub mod counter;
pub mod encoder;
pub mod labels;
pub mod registry;

pub use counter::{CounterSnapshot, LabeledCounter};
pub use labels::LabelKey;
pub use registry::MetricsRegistry;
