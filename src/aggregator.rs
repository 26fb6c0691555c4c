//! The aggregator abstraction shared by all synchronization strategies.
//!
//! An [`Aggregator`] owns a mapping from city name to check-in count,
//! incremented concurrently by any number of producer threads and read by a
//! separate reader through [`snapshot`](Aggregator::snapshot). The aggregator
//! instance is passed explicitly to every producer and reader; there is no
//! ambient or static state.
//!
//! Exactly one strategy governs the shared mapping for the lifetime of an
//! aggregator instance. The [`Strategy`] enum enumerates the available
//! implementations and builds them behind a `Box<dyn Aggregator>` so that runs
//! against different strategies can be compared side by side.

use std::fmt::{self, Display};

use crate::counts::CheckInCounts;
use crate::strategies::concurrent::ConcurrentMap;
use crate::strategies::locked::Locked;
use crate::strategies::mailbox::Mailbox;
use crate::strategies::rcu::Rcu;
use crate::strategies::unsynchronized::Unsynchronized;

/// A per-key check-in counter shared between producer threads and a reader.
///
/// # Contract
///
/// - [`increment`](Aggregator::increment) must be safe to call from any number
///   of threads at once. Whether concurrent increments to the *same* key are
///   all retained depends on the strategy; losing them is the documented
///   failure mode of [`Unsynchronized`], not an error.
/// - [`snapshot`](Aggregator::snapshot) returns a point-in-time copy. It never
///   observes a torn (partially applied) increment. A snapshot taken while
///   producers are still running may reflect any subset of in-flight
///   increments; a snapshot taken after all producers have been joined
///   reflects every retained increment exactly once.
/// - Neither operation fails under documented use, so neither returns a
///   `Result`.
///
/// # Examples
///
/// ```rust
/// use presenze::aggregator::Aggregator;
/// use presenze::strategies::locked::Locked;
///
/// let aggregator = Locked::new();
/// for _ in 0..5 {
///     aggregator.increment("X");
/// }
///
/// let counts = aggregator.snapshot();
/// assert_eq!(counts.get("X"), 5);
/// assert_eq!(counts.total(), 5);
/// ```
pub trait Aggregator: Send + Sync {
    /// Returns the strategy name, used when reporting results.
    fn name(&self) -> &'static str;

    /// Records one check-in for `city`, creating the entry at 1 if absent.
    fn increment(&self, city: &str);

    /// Returns a point-in-time copy of the counts mapping.
    ///
    /// Calling `snapshot` twice with no intervening `increment` returns equal
    /// mappings.
    fn snapshot(&self) -> CheckInCounts;
}

impl Display for dyn Aggregator + '_ {
    /// Formats the aggregator as `name:snapshot`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name(), self.snapshot())
    }
}

/// The available synchronization strategies.
///
/// | Strategy | Correct | Mechanism |
/// |----------|---------|-----------|
/// | [`Unsynchronized`] | no — lost updates | plain load + store read-modify-write |
/// | [`Locked`] | yes | mutex held around each read-modify-write |
/// | [`ConcurrentMap`] | yes | sharded map with atomic per-key update |
/// | [`Rcu`] | yes | immutable map, compare-and-swap with retry |
/// | [`Mailbox`] | yes | single owner thread draining a message queue |
///
/// # Examples
///
/// ```rust
/// use presenze::aggregator::Strategy;
///
/// for strategy in Strategy::ALL {
///     let aggregator = strategy.build();
///     aggregator.increment("Cairo");
///     assert_eq!(aggregator.snapshot().get("Cairo"), 1);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Unsynchronized read-modify-write; loses updates under contention.
    Unsynchronized,
    /// Exclusive lock around every access.
    Locked,
    /// Lock-free-for-readers concurrent map with atomic per-key updates.
    ConcurrentMap,
    /// Immutable snapshot replaced via compare-and-swap, retrying on conflict.
    Rcu,
    /// All mutations funneled through a single-threaded mailbox.
    Mailbox,
}

impl Strategy {
    /// Every strategy, in presentation order.
    pub const ALL: [Strategy; 5] = [
        Strategy::Unsynchronized,
        Strategy::Locked,
        Strategy::ConcurrentMap,
        Strategy::Rcu,
        Strategy::Mailbox,
    ];

    /// The strategies that never lose updates.
    pub const CORRECT: [Strategy; 4] = [
        Strategy::Locked,
        Strategy::ConcurrentMap,
        Strategy::Rcu,
        Strategy::Mailbox,
    ];

    /// Builds a fresh, empty aggregator using this strategy.
    pub fn build(self) -> Box<dyn Aggregator> {
        match self {
            Strategy::Unsynchronized => Box::new(Unsynchronized::new()),
            Strategy::Locked => Box::new(Locked::new()),
            Strategy::ConcurrentMap => Box::new(ConcurrentMap::new()),
            Strategy::Rcu => Box::new(Rcu::new()),
            Strategy::Mailbox => Box::new(Mailbox::new()),
        }
    }

    /// Returns `true` if this strategy retains every increment.
    ///
    /// [`Strategy::Unsynchronized`] is the one strategy for which this is
    /// `false`: its silent undercounting is the property the crate exists to
    /// demonstrate.
    pub const fn is_correct(self) -> bool {
        !matches!(self, Strategy::Unsynchronized)
    }

    /// Returns the strategy name as reported by the built aggregator.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Unsynchronized => "unsynchronized",
            Strategy::Locked => "locked",
            Strategy::ConcurrentMap => "concurrent-map",
            Strategy::Rcu => "rcu",
            Strategy::Mailbox => "mailbox",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_produces_matching_name() {
        for strategy in Strategy::ALL {
            let aggregator = strategy.build();
            assert_eq!(aggregator.name(), strategy.name());
        }
    }

    #[test]
    fn test_build_starts_empty() {
        for strategy in Strategy::ALL {
            let aggregator = strategy.build();
            assert!(aggregator.snapshot().is_empty());
        }
    }

    #[test]
    fn test_correct_excludes_unsynchronized() {
        assert!(!Strategy::Unsynchronized.is_correct());
        for strategy in Strategy::CORRECT {
            assert!(strategy.is_correct());
        }
        assert_eq!(Strategy::ALL.len(), Strategy::CORRECT.len() + 1);
    }

    #[test]
    fn test_single_thread_five_increments() {
        // Concrete scenario: 5 increments to "X" from one thread.
        for strategy in Strategy::ALL {
            let aggregator = strategy.build();
            for _ in 0..5 {
                aggregator.increment("X");
            }
            let counts = aggregator.snapshot();
            assert_eq!(counts.get("X"), 5, "strategy {strategy}");
            assert_eq!(counts.len(), 1);
        }
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        for strategy in Strategy::ALL {
            let aggregator = strategy.build();
            aggregator.increment("Cairo");
            aggregator.increment("Auckland");
            let first = aggregator.snapshot();
            let second = aggregator.snapshot();
            assert_eq!(first, second, "strategy {strategy}");
        }
    }

    #[test]
    fn test_snapshot_is_detached_from_aggregator() {
        for strategy in Strategy::ALL {
            let aggregator = strategy.build();
            aggregator.increment("Cairo");
            let before = aggregator.snapshot();
            aggregator.increment("Cairo");
            assert_eq!(before.get("Cairo"), 1, "strategy {strategy}");
            assert_eq!(aggregator.snapshot().get("Cairo"), 2);
        }
    }

    #[test]
    fn test_dyn_display() {
        let aggregator = Strategy::Locked.build();
        aggregator.increment("Cairo");
        assert_eq!(format!("{}", aggregator.as_ref()), "locked:{Cairo: 1}");
    }
}
