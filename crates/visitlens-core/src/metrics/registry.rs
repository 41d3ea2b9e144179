//! Catalog of labeled counters, get-or-create by name.
//!
//! Lock discipline: the catalog's shard lock is held only for lookup-or-insert
//! and is always released before any counter is touched. Counters never reach
//! back into the registry, so the two levels never nest.

use std::sync::Arc;

use dashmap::DashMap;

use super::counter::{CounterSnapshot, LabeledCounter};
use super::encoder;

#[derive(Default)]
pub struct MetricsRegistry {
    counters: DashMap<String, Arc<LabeledCounter>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Return the counter registered under `name`, creating it if absent.
    ///
    /// The first registration wins: a later call with a different
    /// `description` gets the existing counter unchanged. Concurrent callers
    /// for the same name always receive the same instance.
    pub fn get_or_create(&self, name: &str, description: &str) -> Arc<LabeledCounter> {
        if let Some(existing) = self.counters.get(name) {
            return Arc::clone(existing.value());
        }

        let mut created = false;
        let counter = Arc::clone(
            self.counters
                .entry(name.to_owned())
                .or_insert_with(|| {
                    created = true;
                    Arc::new(LabeledCounter::new(name, description))
                })
                .value(),
        );
        if created {
            tracing::debug!(metric = %name, "registered counter");
        }
        counter
    }

    pub fn get(&self, name: &str) -> Option<Arc<LabeledCounter>> {
        self.counters.get(name).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Snapshot every counter, sorted by name.
    pub fn snapshot(&self) -> Vec<CounterSnapshot> {
        let mut counters: Vec<Arc<LabeledCounter>> =
            self.counters.iter().map(|r| Arc::clone(r.value())).collect();
        counters.sort_by(|a, b| a.name().cmp(b.name()));
        counters.iter().map(|c| c.snapshot()).collect()
    }

    /// Render all counters (sorted by name) separated by blank lines.
    pub fn render_all(&self) -> String {
        encoder::encode_all(&self.snapshot())
    }
}
