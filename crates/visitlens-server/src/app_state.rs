//! Shared application state for the visitlens server.
//!
//! One registry per process by construction: `AppState::new` builds it once and
//! every handler reaches it through the cloned state.

use std::sync::Arc;

use visitlens_core::error::Result;
use visitlens_core::metrics::MetricsRegistry;
use visitlens_core::trace::{
    ConsoleExporter, FanoutExporter, RecentSpans, SpanExporter, Tracer, TracingExporter,
};

use crate::config::{ServerConfig, SpanExporterKind};
use crate::visits::VisitAggregator;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    registry: Arc<MetricsRegistry>,
    visits: VisitAggregator,
    tracer: Tracer,
    recent_spans: Arc<RecentSpans>,
}

impl AppState {
    /// Build application state from a config.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        cfg.validate()?;

        let registry = Arc::new(MetricsRegistry::new());
        let visits = VisitAggregator::new(Arc::clone(&registry));

        let recent_spans = Arc::new(RecentSpans::new(cfg.telemetry.recent_spans));
        let mut exporter = FanoutExporter::new(vec![recent_spans.clone() as Arc<dyn SpanExporter>]);
        match cfg.telemetry.span_exporter {
            SpanExporterKind::Console => exporter.push(Arc::new(ConsoleExporter::stdout())),
            SpanExporterKind::Tracing => exporter.push(Arc::new(TracingExporter)),
            SpanExporterKind::None => {}
        }
        let tracer = Tracer::new(Arc::new(exporter));

        tracing::debug!(
            exporter = ?cfg.telemetry.span_exporter,
            recent_spans = cfg.telemetry.recent_spans,
            "telemetry configured"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                visits,
                tracer,
                recent_spans,
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.inner.registry
    }

    pub fn visits(&self) -> &VisitAggregator {
        &self.inner.visits
    }

    pub fn tracer(&self) -> &Tracer {
        &self.inner.tracer
    }

    pub fn recent_spans(&self) -> &RecentSpans {
        &self.inner.recent_spans
    }
}
