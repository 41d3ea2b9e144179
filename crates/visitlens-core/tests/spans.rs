#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread;

use visitlens_core::trace::{
    AttributeSet, ConsoleExporter, FanoutExporter, RecentSpans, SpanExporter, SpanId, SpanRecord,
    TraceId, Tracer, TracingExporter,
};

fn recording() -> (Tracer, Arc<RecentSpans>) {
    let recent = Arc::new(RecentSpans::new(16));
    (Tracer::new(recent.clone()), recent)
}

/// In-memory writer for console output assertions.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn finish_twice_exports_once() {
    let (tracer, recent) = recording();
    let span = tracer.start("handle_root_request");

    assert!(span.finish());
    assert!(!span.finish());
    drop(span);

    assert_eq!(recent.len(), 1);
}

#[test]
fn drop_finishes_unfinished_span() {
    let (tracer, recent) = recording();
    {
        let mut span = tracer.start("scoped");
        span.set_attribute("http.method", "GET");
    }
    let spans = recent.snapshot();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "scoped");
    assert_eq!(spans[0].attributes.get("http.method"), Some("GET"));
}

#[test]
fn attributes_after_finish_are_ignored() {
    let (tracer, recent) = recording();
    let mut span = tracer.start("frozen");
    span.set_attribute("before", 1);
    assert!(!span.is_finished());
    span.finish();
    assert!(span.is_finished());
    span.set_attribute("after", 2);

    assert_eq!(span.attributes().len(), 1);
    drop(span);
    let spans = recent.snapshot();
    assert_eq!(spans[0].attributes.len(), 1);
    assert_eq!(spans[0].attributes.get("after"), None);
}

#[test]
fn concurrent_finish_exports_once() {
    let (tracer, recent) = recording();
    let span = Arc::new(tracer.start("raced"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let span = Arc::clone(&span);
            thread::spawn(move || span.finish())
        })
        .collect();
    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    drop(span);
    assert_eq!(recent.len(), 1);
}

#[test]
fn in_span_finishes_on_panic() {
    let (tracer, recent) = recording();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        tracer.in_span("boom", |span| {
            span.set_attribute("stage", "before panic");
            panic!("handler failed");
        })
    }));

    assert!(result.is_err());
    let spans = recent.snapshot();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].name, "boom");
}

#[test]
fn spans_get_distinct_identities() {
    let (tracer, _recent) = recording();
    let a = tracer.start("a");
    let b = tracer.start("a");
    assert_ne!(a.identity(), b.identity());
}

#[test]
fn console_format_lists_attributes_in_order() {
    let buf = SharedBuf::default();
    let tracer = Tracer::new(Arc::new(ConsoleExporter::new(buf.clone())));

    let mut span = tracer.start("handle_stats_request");
    let identity = span.identity();
    span.set_attribute("http.method", "GET");
    span.set_attribute("http.status_code", 200);
    span.finish();

    let out = buf.contents();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with(&format!(
        "[OTEL] Span: handle_stats_request, TraceID: {}, SpanID: {}, Duration: ",
        identity.trace_id, identity.span_id
    )));
    assert!(lines[0].ends_with("ms"));
    assert_eq!(lines[1], "[OTEL] Attributes: http.method=GET http.status_code=200");
}

#[test]
fn recent_spans_evicts_oldest() {
    let recent = Arc::new(RecentSpans::new(2));
    let tracer = Tracer::new(recent.clone());
    for name in ["one", "two", "three"] {
        tracer.start(name).finish();
    }
    let names: Vec<_> = recent.snapshot().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["two", "three"]);
}

#[test]
fn fanout_delivers_to_every_sink() {
    let a = Arc::new(RecentSpans::new(4));
    let b = Arc::new(RecentSpans::new(4));
    let fanout = FanoutExporter::new(vec![a.clone() as Arc<dyn SpanExporter>, b.clone()]);
    let tracer = Tracer::new(Arc::new(fanout));

    tracer.start("").finish();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
}

#[test]
fn records_serialize_ids_as_hex() {
    struct Capture(Mutex<Option<SpanRecord>>);
    impl SpanExporter for Capture {
        fn export(&self, record: &SpanRecord) {
            *self.0.lock().unwrap() = Some(record.clone());
        }
    }

    let capture = Arc::new(Capture(Mutex::new(None)));
    let tracer = Tracer::new(capture.clone());
    let mut span = tracer.start("json");
    span.set_attribute("k", "v");
    drop(span);

    let record = capture.0.lock().unwrap().clone().unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["trace_id"].as_str().unwrap().len(), 32);
    assert_eq!(json["span_id"].as_str().unwrap().len(), 16);
    assert_eq!(json["attributes"][0]["key"], "k");
    assert_eq!(json["attributes"][0]["value"], "v");
}

#[test]
fn tracing_exporter_emits_structured_event() {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let mut attributes = AttributeSet::new();
    attributes.append("http.method", "GET");
    attributes.append("http.status_code", 200);
    let record = SpanRecord {
        name: "handle_root_request".into(),
        trace_id: TraceId::from_u128(0xabc),
        span_id: SpanId::from_u64(0x12),
        duration_ms: 3,
        attributes,
    };

    tracing::subscriber::with_default(subscriber, || TracingExporter.export(&record));

    let out = buf.contents();
    assert!(out.contains("span finished"), "{out}");
    assert!(out.contains("span_name=handle_root_request"), "{out}");
    assert!(out.contains(&format!("trace_id={:032x}", 0xabc)), "{out}");
    assert!(out.contains("span_id=0000000000000012"), "{out}");
    assert!(out.contains("duration_ms=3"), "{out}");
    assert!(out.contains("attributes=http.method=GET http.status_code=200"), "{out}");
}
