//! Span sinks.
//!
//! An exporter accepts a finished [`SpanRecord`] and returns nothing; write
//! failures are swallowed so exporting can never fail a request.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use super::span::SpanRecord;

pub trait SpanExporter: Send + Sync {
    fn export(&self, record: &SpanRecord);
}

/// Human-readable two-line writer:
///
/// ```text
/// [OTEL] Span: <name>, TraceID: <32 hex>, SpanID: <16 hex>, Duration: <ms>ms
/// [OTEL] Attributes: k1=v1 k2=v2
/// ```
pub struct ConsoleExporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleExporter {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Format one record (both lines, newline-terminated).
    pub fn format(record: &SpanRecord) -> String {
        format!(
            "[OTEL] Span: {}, TraceID: {}, SpanID: {}, Duration: {}ms\n[OTEL] Attributes: {}\n",
            record.name, record.trace_id, record.span_id, record.duration_ms, record.attributes
        )
    }
}

impl SpanExporter for ConsoleExporter {
    fn export(&self, record: &SpanRecord) {
        let text = Self::format(record);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

/// Emits each span as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingExporter;

impl SpanExporter for TracingExporter {
    fn export(&self, record: &SpanRecord) {
        tracing::info!(
            target: "visitlens::span",
            span_name = %record.name,
            trace_id = %record.trace_id,
            span_id = %record.span_id,
            duration_ms = record.duration_ms,
            attributes = %record.attributes,
            "span finished"
        );
    }
}

/// Bounded ring of the most recently finished spans (oldest evicted first).
pub struct RecentSpans {
    capacity: usize,
    spans: Mutex<VecDeque<SpanRecord>>,
}

impl RecentSpans {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            spans: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copy of the retained spans, oldest first.
    pub fn snapshot(&self) -> Vec<SpanRecord> {
        let spans = self.spans.lock().unwrap_or_else(PoisonError::into_inner);
        spans.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.spans.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpanExporter for RecentSpans {
    fn export(&self, record: &SpanRecord) {
        let record = record.clone();
        let mut spans = self.spans.lock().unwrap_or_else(PoisonError::into_inner);
        if spans.len() == self.capacity {
            spans.pop_front();
        }
        spans.push_back(record);
    }
}

/// Delivers every span to each sink in order.
#[derive(Default)]
pub struct FanoutExporter {
    sinks: Vec<Arc<dyn SpanExporter>>,
}

impl FanoutExporter {
    pub fn new(sinks: Vec<Arc<dyn SpanExporter>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn SpanExporter>) {
        self.sinks.push(sink);
    }
}

impl SpanExporter for FanoutExporter {
    fn export(&self, record: &SpanRecord) {
        for sink in &self.sinks {
            sink.export(record);
        }
    }
}
