//! Span lifecycle: start, annotate, finish exactly once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::attributes::{AttributeSet, AttributeValue};
use super::export::{ConsoleExporter, SpanExporter};
use super::id::{SpanId, SpanIdentity, TraceId};

/// A finished span as handed to exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanRecord {
    pub name: String,
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub duration_ms: u64,
    pub attributes: AttributeSet,
}

/// Starts spans that report to one exporter.
#[derive(Clone)]
pub struct Tracer {
    exporter: Arc<dyn SpanExporter>,
}

impl Tracer {
    pub fn new(exporter: Arc<dyn SpanExporter>) -> Self {
        Self { exporter }
    }

    /// Start a span. `name` may be empty.
    pub fn start(&self, name: impl Into<String>) -> Span {
        Span {
            name: name.into(),
            identity: SpanIdentity::generate(),
            start: Instant::now(),
            attributes: AttributeSet::new(),
            finished: AtomicBool::new(false),
            exporter: Arc::clone(&self.exporter),
        }
    }

    /// Run `f` inside a span that is finished on every exit path of `f`,
    /// including unwinding.
    pub fn in_span<R>(&self, name: impl Into<String>, f: impl FnOnce(&mut Span) -> R) -> R {
        let mut span = self.start(name);
        f(&mut span)
        // `span` drops here and finishes if `f` did not.
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(Arc::new(ConsoleExporter::stdout()))
    }
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// One in-flight unit of work.
///
/// Owned by the code path that started it. Finishing is idempotent and safe
/// from several threads: only the first `finish` exports. Dropping an
/// unfinished span finishes it.
pub struct Span {
    name: String,
    identity: SpanIdentity,
    start: Instant,
    attributes: AttributeSet,
    finished: AtomicBool,
    exporter: Arc<dyn SpanExporter>,
}

impl Span {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> SpanIdentity {
        self.identity
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Append an attribute. Ignored once the span is finished.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        if *self.finished.get_mut() {
            tracing::trace!(span = %self.name, "attribute on finished span ignored");
            return;
        }
        self.attributes.append(key, value);
    }

    /// Finish the span and export it. Returns `false` if it was already finished.
    pub fn finish(&self) -> bool {
        if self.finished.swap(true, Ordering::AcqRel) {
            return false;
        }
        let record = SpanRecord {
            name: self.name.clone(),
            trace_id: self.identity.trace_id,
            span_id: self.identity.span_id,
            duration_ms: u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX),
            attributes: self.attributes.clone(),
        };
        self.exporter.export(&record);
        true
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        self.finish();
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Span")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("attributes", &self.attributes)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}
