//! Producer workload harness with an explicit completion barrier.
//!
//! [`Workload`] describes a fixed run: `P` producer threads, each issuing `E`
//! increments, cycling through a list of city keys by event index.
//! [`Workload::run`] spawns the producers against one aggregator instance,
//! **joins them all**, and only then takes the snapshot. The join is the
//! "producers are done" signal; there is no sleep-and-hope in sight.
//!
//! The aggregator is passed in explicitly. Running the same workload against
//! different strategies is how the strategies are compared:
//!
//! ```rust
//! use presenze::aggregator::Strategy;
//! use presenze::workload::Workload;
//!
//! let workload = Workload::new()
//!     .with_producers(2)
//!     .with_events_per_producer(1000)
//!     .with_keys(["Cairo", "Auckland"]);
//!
//! for strategy in Strategy::CORRECT {
//!     let aggregator = strategy.build();
//!     let counts = workload.run(aggregator.as_ref());
//!     assert_eq!(counts.total(), workload.expected_total());
//! }
//! ```

use std::thread;

use crate::aggregator::Aggregator;
use crate::counts::CheckInCounts;

/// A fixed producer workload: who checks in, where, and how many times.
///
/// Defaults to the reference run: 2 producers, 1000 events each, alternating
/// between "Cairo" and "Auckland".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    producers: usize,
    events_per_producer: usize,
    keys: Vec<String>,
}

impl Workload {
    /// Creates the reference workload: 2 producers × 1000 events over
    /// "Cairo" and "Auckland".
    pub fn new() -> Self {
        Self {
            producers: 2,
            events_per_producer: 1000,
            keys: vec!["Cairo".to_owned(), "Auckland".to_owned()],
        }
    }

    /// Sets the number of producer threads.
    pub fn with_producers(mut self, producers: usize) -> Self {
        self.producers = producers;
        self
    }

    /// Sets how many increments each producer issues.
    pub fn with_events_per_producer(mut self, events: usize) -> Self {
        self.events_per_producer = events;
        self
    }

    /// Sets the city keys. Each producer cycles through them by event index,
    /// so two keys mean alternating check-ins, one key means a single
    /// maximally contended key.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the number of producer threads.
    pub fn producers(&self) -> usize {
        self.producers
    }

    /// Returns the number of increments each producer issues.
    pub fn events_per_producer(&self) -> usize {
        self.events_per_producer
    }

    /// The total number of increments the workload issues: `P * E`.
    ///
    /// A snapshot taken after the run equals this for every correct strategy;
    /// falling short of it is the lost-update deficit.
    pub fn expected_total(&self) -> u64 {
        (self.producers * self.events_per_producer) as u64
    }

    /// How many of one producer's events land on the key at `index`.
    ///
    /// Keys early in the list get the remainder when the event count does not
    /// divide evenly.
    pub fn events_per_key(&self, index: usize) -> u64 {
        if index >= self.keys.len() {
            return 0;
        }
        let whole_cycles = self.events_per_producer / self.keys.len();
        let remainder = self.events_per_producer % self.keys.len();
        (whole_cycles + usize::from(index < remainder)) as u64
    }

    /// Runs the workload against `aggregator`: spawns the producers, joins
    /// them all, then returns the final snapshot.
    ///
    /// The scope exit is the completion barrier — `run` returns only after
    /// every producer has finished, so for a correct strategy the returned
    /// snapshot reflects every increment exactly once.
    pub fn run(&self, aggregator: &dyn Aggregator) -> CheckInCounts {
        if self.keys.is_empty() || self.producers == 0 || self.events_per_producer == 0 {
            return aggregator.snapshot();
        }

        tracing::debug!(
            strategy = aggregator.name(),
            producers = self.producers,
            events_per_producer = self.events_per_producer,
            keys = self.keys.len(),
            "workload started"
        );

        thread::scope(|scope| {
            for producer in 0..self.producers {
                scope.spawn(move || {
                    for event in 0..self.events_per_producer {
                        let city = &self.keys[event % self.keys.len()];
                        aggregator.increment(city);
                    }
                    tracing::debug!(producer, "producer finished");
                });
            }
        });

        aggregator.snapshot()
    }
}

impl Default for Workload {
    /// The reference workload, same as [`Workload::new`].
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Strategy;
    use proptest::prelude::*;

    #[test]
    fn test_reference_workload_defaults() {
        let workload = Workload::new();
        assert_eq!(workload.producers(), 2);
        assert_eq!(workload.events_per_producer(), 1000);
        assert_eq!(workload.expected_total(), 2000);
    }

    #[test]
    fn test_events_per_key_even_split() {
        let workload = Workload::new(); // 1000 events over 2 keys
        assert_eq!(workload.events_per_key(0), 500);
        assert_eq!(workload.events_per_key(1), 500);
        assert_eq!(workload.events_per_key(2), 0);
    }

    #[test]
    fn test_events_per_key_remainder_goes_to_early_keys() {
        let workload = Workload::new()
            .with_events_per_producer(10)
            .with_keys(["A", "B", "C"]);
        assert_eq!(workload.events_per_key(0), 4);
        assert_eq!(workload.events_per_key(1), 3);
        assert_eq!(workload.events_per_key(2), 3);
    }

    #[test]
    fn test_empty_keys_is_a_noop_run() {
        let workload = Workload::new().with_keys(Vec::<String>::new());
        let aggregator = Strategy::Locked.build();
        assert!(workload.run(aggregator.as_ref()).is_empty());
    }

    #[test]
    fn test_correct_strategies_count_reference_workload_exactly() {
        // 2 producers × 1000 events alternating "A"/"B": 1000 check-ins per
        // key, for every correct strategy.
        let workload = Workload::new().with_keys(["A", "B"]);
        for strategy in Strategy::CORRECT {
            let aggregator = strategy.build();
            let counts = workload.run(aggregator.as_ref());
            assert_eq!(counts.get("A"), 1000, "strategy {strategy}");
            assert_eq!(counts.get("B"), 1000, "strategy {strategy}");
            assert_eq!(counts.total(), workload.expected_total());
        }
    }

    #[test]
    fn test_single_producer_is_exact_for_all_strategies() {
        // Without a second producer there is no race to lose.
        let workload = Workload::new()
            .with_producers(1)
            .with_events_per_producer(5)
            .with_keys(["X"]);
        for strategy in Strategy::ALL {
            let counts = workload.run(strategy.build().as_ref());
            assert_eq!(counts.get("X"), 5, "strategy {strategy}");
        }
    }

    #[test]
    fn test_unsynchronized_never_overcounts() {
        let workload = Workload::new();
        let counts = workload.run(Strategy::Unsynchronized.build().as_ref());
        assert!(counts.total() <= workload.expected_total());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_correct_strategies_never_lose_updates(
            producers in 1usize..4,
            events in 1usize..64,
        ) {
            let workload = Workload::new()
                .with_producers(producers)
                .with_events_per_producer(events);
            for strategy in Strategy::CORRECT {
                let counts = workload.run(strategy.build().as_ref());
                prop_assert_eq!(counts.total(), (producers * events) as u64);
            }
        }

        #[test]
        fn prop_per_key_counts_match_key_cycle(
            producers in 1usize..4,
            events in 1usize..64,
        ) {
            let workload = Workload::new()
                .with_producers(producers)
                .with_events_per_producer(events)
                .with_keys(["A", "B", "C"]);
            for strategy in Strategy::CORRECT {
                let counts = workload.run(strategy.build().as_ref());
                for (index, key) in ["A", "B", "C"].iter().enumerate() {
                    prop_assert_eq!(
                        counts.get(key),
                        workload.events_per_key(index) * producers as u64
                    );
                }
            }
        }
    }
}
