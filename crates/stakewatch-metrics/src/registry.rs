// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Per-scrape gauge slots

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::Metric;

/// A gauge slot: a metric family plus values for its variable labels
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    /// Metric family
    pub metric: Metric,
    /// Label values, ordered as [`Metric::label_names`]
    pub label_values: Vec<String>,
}

impl SlotKey {
    /// Key for `metric` with `label_values`
    pub fn new(metric: Metric, label_values: &[&str]) -> Self {
        Self {
            metric,
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Gauge slots collected during one scrape
///
/// Cheap to clone; clones share the same slots so each query task can own
/// a handle. A slot holds the last value written to it. Slots that were
/// never written do not exist and are not rendered.
#[derive(Clone, Default)]
pub struct ScrapeRegistry {
    inner: Arc<Mutex<BTreeMap<SlotKey, f64>>>,
}

impl ScrapeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an unlabeled gauge
    pub fn set(&self, metric: Metric, value: f64) {
        self.set_labeled(metric, &[], value);
    }

    /// Set a labeled gauge, overwriting any earlier value
    pub fn set_labeled(&self, metric: Metric, label_values: &[&str], value: f64) {
        self.slots().insert(SlotKey::new(metric, label_values), value);
    }

    /// Current value of a slot
    pub fn value(&self, metric: Metric, label_values: &[&str]) -> Option<f64> {
        self.slots().get(&SlotKey::new(metric, label_values)).copied()
    }

    /// Copy of every populated slot, ordered by metric then labels
    pub fn snapshot(&self) -> BTreeMap<SlotKey, f64> {
        self.slots().clone()
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    /// Whether nothing has been written yet
    /// Whether no slot has been written
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    // A panicking writer cannot leave a half-written f64 behind
    fn slots(&self) -> MutexGuard<'_, BTreeMap<SlotKey, f64>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_slot_is_absent() {
        let registry = ScrapeRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.value(Metric::Inflation, &[]), None);
    }

    #[test]
    fn test_last_write_wins() {
        let registry = ScrapeRegistry::new();
        registry.set(Metric::LatestBlockHeight, 10.0);
        registry.set(Metric::LatestBlockHeight, 11.0);

        assert_eq!(registry.value(Metric::LatestBlockHeight, &[]), Some(11.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_labels_are_distinct_slots() {
        let registry = ScrapeRegistry::new();
        registry.set_labeled(Metric::QuerySuccess, &["inflation"], 1.0);
        registry.set_labeled(Metric::QuerySuccess, &["gov_proposals"], 0.0);

        assert_eq!(registry.value(Metric::QuerySuccess, &["inflation"]), Some(1.0));
        assert_eq!(registry.value(Metric::QuerySuccess, &["gov_proposals"]), Some(0.0));
        assert_eq!(registry.value(Metric::QuerySuccess, &[]), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_value_uses_snapshot_key() {
        let registry = ScrapeRegistry::new();
        registry.set_labeled(Metric::SupplyTotal, &["atom"], 390.0);

        let key = SlotKey::new(Metric::SupplyTotal, &["atom"]);
        assert_eq!(registry.snapshot().get(&key), Some(&390.0));
        assert_eq!(registry.value(Metric::SupplyTotal, &["atom"]), Some(390.0));
        assert_eq!(registry.value(Metric::SupplyTotal, &["osmo"]), None);
        assert_eq!(registry.value(Metric::CommunityPool, &["atom"]), None);
    }

    #[test]
    fn test_clones_share_slots() {
        let registry = ScrapeRegistry::new();
        let handle = registry.clone();
        handle.set(Metric::TokenPrice, 9.5);

        assert_eq!(registry.value(Metric::TokenPrice, &[]), Some(9.5));
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let registry = ScrapeRegistry::new();
        let mut tasks = tokio::task::JoinSet::new();

        for i in 0..16 {
            let handle = registry.clone();
            tasks.spawn(async move {
                let label = format!("q{i}");
                handle.set_labeled(Metric::QuerySuccess, &[label.as_str()], 1.0);
            });
        }
        while tasks.join_next().await.is_some() {}

        assert_eq!(registry.len(), 16);
    }
}
