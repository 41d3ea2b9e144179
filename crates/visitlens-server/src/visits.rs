//! Visit accounting.
//!
//! Each visit bumps the local total and per-path counts and mirrors both into
//! the shared [`MetricsRegistry`]:
//! - `otel_visit_counter_total` (no labels)
//! - one counter per path, named by [`path_metric_name`], labeled `path="<path>"`
//!
//! The total is a lock-free atomic. The per-path map is guarded by a mutex held
//! only for one increment or one copy. Registry mirrors are applied by the same
//! call, so no visit updates one side without the other.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use serde::Serialize;
use visitlens_core::metrics::{encoder, CounterSnapshot, LabelKey, LabeledCounter, MetricsRegistry};

pub const TOTAL_METRIC: &str = "otel_visit_counter_total";
const TOTAL_METRIC_HELP: &str = "Total number of visits to the server (OTEL)";

pub const ROOT_PATH_METRIC: &str = "otel_path_root_visits";

const LOCAL_TOTAL_METRIC: &str = "visit_counter_total";
const LOCAL_PATH_METRIC: &str = "path_visits_total";

/// Metric name of the per-path mirror counter.
///
/// `/` maps to `otel_path_root_visits`; any other path drops its leading `/`,
/// turns the remaining `/` into `_` and is wrapped as `otel_path_<..>_visits`.
pub fn path_metric_name(path: &str) -> String {
    if path == "/" {
        return ROOT_PATH_METRIC.to_string();
    }
    let suffix = path.strip_prefix('/').unwrap_or(path).replace('/', "_");
    format!("otel_path_{suffix}_visits")
}

/// Point-in-time copy of the visit counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VisitSnapshot {
    pub total: u64,
    pub paths: BTreeMap<String, u64>,
}

pub struct VisitAggregator {
    total: AtomicU64,
    per_path: Mutex<BTreeMap<String, u64>>,
    registry: Arc<MetricsRegistry>,
    total_metric: Arc<LabeledCounter>,
    path_metrics: DashMap<String, Arc<LabeledCounter>>,
}

impl VisitAggregator {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        let total_metric = registry.get_or_create(TOTAL_METRIC, TOTAL_METRIC_HELP);
        Self {
            total: AtomicU64::new(0),
            per_path: Mutex::new(BTreeMap::new()),
            registry,
            total_metric,
            path_metrics: DashMap::new(),
        }
    }

    /// Record one visit to `path` and return the new total.
    pub fn record_visit(&self, path: &str) -> u64 {
        let total = self.total.fetch_add(1, Ordering::AcqRel) + 1;
        self.total_metric.inc(&[]);

        {
            let mut per_path = self.per_path.lock().unwrap_or_else(PoisonError::into_inner);
            *per_path.entry(path.to_owned()).or_insert(0) += 1;
        }
        self.path_metric(path).inc(&[("path", path)]);

        tracing::debug!(path, total, "visit recorded");
        total
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    /// Detached copy; iterating it never touches live state.
    pub fn snapshot(&self) -> VisitSnapshot {
        let paths = self
            .per_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        VisitSnapshot {
            total: self.total(),
            paths,
        }
    }

    /// Local counts as `visit_counter_total` and `path_visits_total{path=..}`.
    pub fn render_local(&self) -> String {
        let snap = self.snapshot();

        let total = CounterSnapshot {
            name: LOCAL_TOTAL_METRIC.into(),
            description: "Total number of visits to the server".into(),
            rows: vec![(LabelKey::empty(), snap.total)],
        };

        let mut rows: Vec<(LabelKey, u64)> = snap
            .paths
            .iter()
            .map(|(path, n)| (LabelKey::new(&[("path", path.as_str())]), *n))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        let per_path = CounterSnapshot {
            name: LOCAL_PATH_METRIC.into(),
            description: "Number of visits per path".into(),
            rows,
        };

        encoder::encode_all(&[total, per_path])
    }

    /// Full `/metrics` body: local block, blank line, then the registry.
    pub fn render_metrics(&self) -> String {
        let mut out = self.render_local();
        let registry = self.registry.render_all();
        if !registry.is_empty() {
            out.push('\n');
            out.push_str(&registry);
        }
        out
    }

    fn path_metric(&self, path: &str) -> Arc<LabeledCounter> {
        if let Some(m) = self.path_metrics.get(path) {
            return Arc::clone(m.value());
        }
        let counter = self.registry.get_or_create(
            &path_metric_name(path),
            &format!("Visits to path {path} (OTEL)"),
        );
        Arc::clone(
            self.path_metrics
                .entry(path.to_owned())
                .or_insert(counter)
                .value(),
        )
    }
}
