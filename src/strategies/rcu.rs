//! The immutable-snapshot strategy: compare-and-swap with retry.
//!
//! The mapping itself is never mutated. An increment clones the current map,
//! applies the change to the clone, and swaps the new map in atomically — but
//! only if the reference still points at the map the clone was taken from.
//! When another producer won the race, the swap fails and the update is
//! recomputed from the fresh map. [`ArcSwap::rcu`] runs exactly this
//! compare-and-swap retry loop.
//!
//! Readers win big here: a snapshot is a single atomic load of the current
//! `Arc`, with no lock and no copying. Writers pay for it by cloning the whole
//! map per increment, so this strategy suits read-heavy workloads and small
//! maps.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::aggregator::Aggregator;
use crate::counts::CheckInCounts;

/// An aggregator holding an immutable map behind an atomically swappable
/// reference.
///
/// # Examples
///
/// ```rust
/// use presenze::aggregator::Aggregator;
/// use presenze::strategies::rcu::Rcu;
///
/// let aggregator = Rcu::new();
/// aggregator.increment("Cairo");
/// aggregator.increment("Auckland");
/// assert_eq!(aggregator.snapshot().total(), 2);
/// ```
#[derive(Debug)]
pub struct Rcu {
    counts: ArcSwap<HashMap<String, u64>>,
}

impl Rcu {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self {
            counts: ArcSwap::from_pointee(HashMap::new()),
        }
    }
}

impl Default for Rcu {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for Rcu {
    fn name(&self) -> &'static str {
        "rcu"
    }

    fn increment(&self, city: &str) {
        // rcu() retries the closure until the compare-and-swap succeeds, so
        // the clone is always taken from the map the swap will replace.
        self.counts.rcu(|current| {
            let mut next = HashMap::clone(current);
            *next.entry(city.to_owned()).or_insert(0) += 1;
            next
        });
    }

    fn snapshot(&self) -> CheckInCounts {
        let current: Arc<HashMap<String, u64>> = self.counts.load_full();
        CheckInCounts::from(&*current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_increment_creates_entry_at_one() {
        let aggregator = Rcu::new();
        aggregator.increment("Cairo");
        assert_eq!(aggregator.snapshot().get("Cairo"), 1);
    }

    #[test]
    fn test_snapshot_is_immutable_under_later_increments() {
        let aggregator = Rcu::new();
        aggregator.increment("Cairo");
        let before = aggregator.snapshot();
        for _ in 0..10 {
            aggregator.increment("Cairo");
        }
        assert_eq!(before.get("Cairo"), 1);
        assert_eq!(aggregator.snapshot().get("Cairo"), 11);
    }

    #[test]
    fn test_contended_key_retains_every_increment() {
        let aggregator = Rcu::new();

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        aggregator.increment("Cairo");
                    }
                });
            }
        });

        assert_eq!(aggregator.snapshot().get("Cairo"), 2000);
    }

    #[test]
    fn test_alternating_keys_split_evenly() {
        let aggregator = Rcu::new();

        thread::scope(|scope| {
            for _ in 0..2 {
                scope.spawn(|| {
                    for i in 0..1000 {
                        let city = if i % 2 == 0 { "A" } else { "B" };
                        aggregator.increment(city);
                    }
                });
            }
        });

        let counts = aggregator.snapshot();
        assert_eq!(counts.get("A"), 1000);
        assert_eq!(counts.get("B"), 1000);
    }
}
