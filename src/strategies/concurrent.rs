//! The concurrent-map strategy: atomic per-key updates.
//!
//! Instead of one lock over the whole map, [`DashMap`] shards the key space
//! and makes each per-key update atomic through its entry API. Producers
//! touching different keys proceed without blocking each other; producers
//! touching the same key serialize only on that key's shard. This is the
//! thread-safe-data-structure fix for the lost update.

use dashmap::DashMap;

use crate::aggregator::Aggregator;
use crate::counts::CheckInCounts;

/// An aggregator backed by a sharded concurrent map.
///
/// The increment goes through `entry().and_modify().or_insert()`, which holds
/// the key's shard for the whole update-if-present-else-insert, so no
/// read-modify-write can interleave with another on the same key.
///
/// # Examples
///
/// ```rust
/// use presenze::aggregator::Aggregator;
/// use presenze::strategies::concurrent::ConcurrentMap;
///
/// let aggregator = ConcurrentMap::new();
/// aggregator.increment("Cairo");
/// aggregator.increment("Cairo");
/// assert_eq!(aggregator.snapshot().get("Cairo"), 2);
/// ```
#[derive(Debug, Default)]
pub struct ConcurrentMap {
    counts: DashMap<String, u64>,
}

impl ConcurrentMap {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for ConcurrentMap {
    fn name(&self) -> &'static str {
        "concurrent-map"
    }

    fn increment(&self, city: &str) {
        self.counts
            .entry(city.to_owned())
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn snapshot(&self) -> CheckInCounts {
        // Iteration locks one shard at a time: each per-key count is read
        // whole (never torn), though a concurrent snapshot may include only a
        // subset of in-flight increments.
        self.counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}
