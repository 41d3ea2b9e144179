#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use visitlens_core::metrics::MetricsRegistry;
use visitlens_server::visits::{path_metric_name, VisitAggregator, TOTAL_METRIC};

#[test]
fn path_metric_names_follow_substitution_rule() {
    assert_eq!(path_metric_name("/"), "otel_path_root_visits");
    assert_eq!(path_metric_name("/metrics"), "otel_path_metrics_visits");
    assert_eq!(path_metric_name("/stats"), "otel_path_stats_visits");
    assert_eq!(path_metric_name("/a/b"), "otel_path_a_b_visits");
}

#[test]
fn concurrent_root_visits_then_stats() {
    let registry = Arc::new(MetricsRegistry::new());
    let visits = Arc::new(VisitAggregator::new(Arc::clone(&registry)));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let visits = Arc::clone(&visits);
            thread::spawn(move || visits.record_visit("/"))
        })
        .collect();
    let mut returned: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    returned.sort_unstable();
    assert_eq!(returned, [1, 2, 3]);

    assert_eq!(visits.record_visit("/stats"), 4);

    let snap = visits.snapshot();
    assert_eq!(snap.total, 4);
    assert_eq!(snap.paths["/"], 3);
    assert_eq!(snap.paths["/stats"], 1);

    let text = registry.render_all();
    assert!(text.contains(
        "# HELP otel_path_root_visits Visits to path / (OTEL)\n\
         # TYPE otel_path_root_visits counter\n\
         otel_path_root_visits{path=\"/\"} 3\n"
    ));
    assert!(text.contains(
        "# TYPE otel_path_stats_visits counter\n\
         otel_path_stats_visits{path=\"/stats\"} 1\n"
    ));
    assert!(text.contains("otel_visit_counter_total 4\n"));
}

#[test]
fn many_threads_keep_local_and_mirror_in_step() {
    const THREADS: usize = 8;
    const PER_THREAD: u64 = 500;

    let registry = Arc::new(MetricsRegistry::new());
    let visits = Arc::new(VisitAggregator::new(Arc::clone(&registry)));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let visits = Arc::clone(&visits);
            thread::spawn(move || {
                let path = if i % 2 == 0 { "/" } else { "/a/b" };
                for _ in 0..PER_THREAD {
                    visits.record_visit(path);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let expected = THREADS as u64 * PER_THREAD;
    let snap = visits.snapshot();
    assert_eq!(snap.total, expected);
    assert_eq!(snap.paths.values().sum::<u64>(), expected);
    assert_eq!(registry.get(TOTAL_METRIC).unwrap().get(&[]), expected);
    assert_eq!(
        registry
            .get("otel_path_a_b_visits")
            .unwrap()
            .get(&[("path", "/a/b")]),
        expected / 2
    );
}

#[test]
fn snapshot_is_detached_from_live_state() {
    let visits = VisitAggregator::new(Arc::new(MetricsRegistry::new()));
    visits.record_visit("/");
    let snap = visits.snapshot();
    visits.record_visit("/");
    visits.record_visit("/new");

    assert_eq!(snap.total, 1);
    assert_eq!(snap.paths.len(), 1);
    assert_eq!(visits.snapshot().total, 3);
}

#[test]
fn local_exposition_lists_paths_in_order() {
    let visits = VisitAggregator::new(Arc::new(MetricsRegistry::new()));
    visits.record_visit("/stats");
    visits.record_visit("/");
    visits.record_visit("/");

    assert_eq!(
        visits.render_local(),
        "# HELP visit_counter_total Total number of visits to the server\n\
         # TYPE visit_counter_total counter\n\
         visit_counter_total 3\n\
         \n\
         # HELP path_visits_total Number of visits per path\n\
         # TYPE path_visits_total counter\n\
         path_visits_total{path=\"/\"} 2\n\
         path_visits_total{path=\"/stats\"} 1\n"
    );
}

#[test]
fn metrics_body_appends_registry() {
    let visits = VisitAggregator::new(Arc::new(MetricsRegistry::new()));
    visits.record_visit("/metrics");

    let body = visits.render_metrics();
    let local_end = body.find("path_visits_total{path=\"/metrics\"} 1\n").unwrap();
    let registry_start = body.find("# HELP otel_path_metrics_visits").unwrap();
    assert!(local_end < registry_start);
    assert!(body.contains("otel_path_metrics_visits{path=\"/metrics\"} 1\n"));
}
