use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::error::{Result, VisitLensError};

use super::encoder;
use super::labels::LabelKey;

/// Point-in-time copy of a counter, rows sorted by [`LabelKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub name: String,
    pub description: String,
    pub rows: Vec<(LabelKey, u64)>,
}

/// A named counter accumulating independently per label combination.
///
/// Totals only ever grow and saturate at `u64::MAX` instead of wrapping.
/// Each `add` touches exactly one entry: an existing
/// entry is bumped under a shared shard lock, a missing one is created under
/// the shard's write lock.
pub struct LabeledCounter {
    name: String,
    description: String,
    totals: DashMap<LabelKey, AtomicU64>,
}

impl LabeledCounter {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            totals: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(1, labels);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, amount: u64, labels: &[(&str, &str)]) {
        self.add_key(amount, LabelKey::new(labels));
    }

    /// Increment an already canonicalized label combination.
    pub fn add_key(&self, amount: u64, key: LabelKey) {
        if let Some(slot) = self.totals.get(&key) {
            saturating_add(&slot, amount);
            return;
        }
        let slot = self.totals.entry(key).or_insert_with(|| AtomicU64::new(0));
        saturating_add(&slot, amount);
    }

    /// Signed increment. Negative amounts are rejected and leave totals untouched.
    pub fn try_add(&self, amount: i64, labels: &[(&str, &str)]) -> Result<()> {
        let Ok(amount) = u64::try_from(amount) else {
            tracing::warn!(metric = %self.name, amount, "rejected negative counter increment");
            return Err(VisitLensError::NegativeIncrement {
                metric: self.name.clone(),
                amount,
            });
        };
        self.add(amount, labels);
        Ok(())
    }

    /// Current value for one label combination.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.totals
            .get(&LabelKey::new(labels))
            .map(|v| v.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Copy current values. Shard locks are held only while copying.
    pub fn snapshot(&self) -> CounterSnapshot {
        let mut rows: Vec<(LabelKey, u64)> = self
            .totals
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        CounterSnapshot {
            name: self.name.clone(),
            description: self.description.clone(),
            rows,
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        encoder::encode(&self.snapshot())
    }
}

fn saturating_add(slot: &AtomicU64, amount: u64) {
    // The closure never returns `None`, so the update always succeeds.
    let _ = slot.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
        Some(v.saturating_add(amount))
    });
}

impl std::fmt::Debug for LabeledCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabeledCounter")
            .field("name", &self.name)
            .field("series", &self.totals.len())
            .finish()
    }
}
