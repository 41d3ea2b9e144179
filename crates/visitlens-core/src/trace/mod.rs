//! Flat, locally recorded spans.
//!
//! A [`Tracer`] starts [`Span`]s; each span accumulates attributes and is
//! finished exactly once, either explicitly or when it goes out of scope.
//! Finished spans are handed to a pluggable [`SpanExporter`]. Nothing here is
//! ever transmitted off-process.

pub mod attributes;
pub mod export;
pub mod id;
pub mod span;

pub use attributes::{Attribute, AttributeSet, AttributeValue};
pub use export::{ConsoleExporter, FanoutExporter, RecentSpans, SpanExporter, TracingExporter};
pub use id::{SpanId, SpanIdentity, TraceId};
pub use span::{Span, SpanRecord, Tracer};
