//! The exclusive-lock strategy: a mutex around the whole map.
//!
//! The simplest correct fix for the lost update: hold a mutual-exclusion lock
//! for the duration of every read-modify-write, so the load and the store of
//! one increment can never interleave with another's. Producers incrementing
//! at the same time serialize on the lock; the cost is contention, not
//! correctness.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::aggregator::Aggregator;
use crate::counts::CheckInCounts;

/// An aggregator guarding its map with a [`Mutex`].
///
/// # Examples
///
/// ```rust
/// use presenze::aggregator::Aggregator;
/// use presenze::strategies::locked::Locked;
/// use std::sync::Arc;
/// use std::thread;
///
/// let aggregator = Arc::new(Locked::new());
/// let mut handles = vec![];
///
/// for _ in 0..4 {
///     let aggregator = Arc::clone(&aggregator);
///     handles.push(thread::spawn(move || {
///         for _ in 0..1000 {
///             aggregator.increment("Cairo");
///         }
///     }));
/// }
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(aggregator.snapshot().get("Cairo"), 4000);
/// ```
#[derive(Debug, Default)]
pub struct Locked {
    counts: Mutex<HashMap<String, u64>>,
}

impl Locked {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for Locked {
    fn name(&self) -> &'static str {
        "locked"
    }

    fn increment(&self, city: &str) {
        let mut counts = self.counts.lock();
        *counts.entry(city.to_owned()).or_insert(0) += 1;
    }

    fn snapshot(&self) -> CheckInCounts {
        CheckInCounts::from(&*self.counts.lock())
    }
}
