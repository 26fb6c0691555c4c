//! The no-coordination strategy: loses updates on purpose.
//!
//! This is the baseline every other strategy exists to fix. Each key maps to
//! its own counter cell, and an increment performs a plain `load`, adds one,
//! and `store`s the result back. Two producers that load the same value at the
//! same time both store `value + 1`, and one of the two check-ins vanishes: a
//! **lost update**.
//!
//! The failure mode is silent undercounting, not an error, and reproducing it
//! observably is this type's entire purpose. Do not "fix" the load/store pair
//! with `fetch_add`.
//!
//! # Why atomics at all?
//!
//! Rust will not compile a plain `HashMap<String, u64>` mutated from two
//! threads, and an `unsafe` rendition would be undefined behavior rather than
//! a demonstration. Per-key [`AtomicU64`] cells keep every individual `load`
//! and `store` well-defined while leaving the read-modify-write *sequence*
//! unprotected, which is exactly the race under study. Entry creation goes
//! through an [`RwLock`] write lock, so the race is confined to counting, not
//! to the map structure itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;
use parking_lot::RwLock;

use crate::aggregator::Aggregator;
use crate::counts::CheckInCounts;

/// An aggregator with an unsynchronized read-modify-write: concurrent
/// producers incrementing the same key lose updates.
///
/// Counter cells are cache-line padded so that the demonstrated deficit comes
/// from the load/store race itself, not from false sharing noise between
/// neighboring keys.
///
/// # Examples
///
/// Single-threaded use is perfectly accurate; only concurrent writers to the
/// same key go wrong:
///
/// ```rust
/// use presenze::aggregator::Aggregator;
/// use presenze::strategies::unsynchronized::Unsynchronized;
///
/// let aggregator = Unsynchronized::new();
/// aggregator.increment("Cairo");
/// aggregator.increment("Cairo");
/// assert_eq!(aggregator.snapshot().get("Cairo"), 2);
/// ```
#[derive(Debug, Default)]
pub struct Unsynchronized {
    cells: RwLock<HashMap<String, CachePadded<AtomicU64>>>,
}

impl Unsynchronized {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The racy read-modify-write, kept in one place so the race is easy to
    /// point at.
    #[inline]
    fn bump(cell: &AtomicU64) {
        let seen = cell.load(Ordering::Relaxed);
        // Not fetch_add: a concurrent producer that loaded the same `seen`
        // overwrites this store, losing one check-in.
        cell.store(seen + 1, Ordering::Relaxed);
    }
}

impl Aggregator for Unsynchronized {
    fn name(&self) -> &'static str {
        "unsynchronized"
    }

    fn increment(&self, city: &str) {
        {
            let cells = self.cells.read();
            if let Some(cell) = cells.get(city) {
                Self::bump(cell);
                return;
            }
        }
        // First check-in for this city: take the write lock to create the
        // cell, then perform the same unprotected read-modify-write on it.
        let mut cells = self.cells.write();
        let cell = cells
            .entry(city.to_owned())
            .or_insert_with(|| CachePadded::new(AtomicU64::new(0)));
        Self::bump(cell);
    }

    fn snapshot(&self) -> CheckInCounts {
        self.cells
            .read()
            .iter()
            .map(|(city, cell)| (city.clone(), cell.load(Ordering::Relaxed)))
            .collect()
    }
}
