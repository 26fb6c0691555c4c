//! # Presenze - Per-Key Check-In Counters, Five Ways
//!
//! A Rust library that accumulates per-city check-in counts from multiple
//! concurrent producer threads and exposes a consistent snapshot to a reader —
//! implemented five times, once per synchronization strategy, so the
//! strategies can be compared against the same workload.
//!
//! ## The Problem
//!
//! The obvious way to count check-ins is a shared map and a read-modify-write:
//! load the city's count, add one, store it back. With a single thread that is
//! fine. With two producers it silently undercounts: both load the same value,
//! both store `value + 1`, and one check-in is gone. This is the classic
//! **lost update**, and it throws no error — the only symptom is that the
//! numbers are wrong.
//!
//! This crate keeps that broken strategy around on purpose
//! ([`strategies::unsynchronized`]) because observing the deficit is the whole
//! point. The other four strategies each fix it with a different mechanism.
//!
//! ## The Strategies
//!
//! | Strategy | Correct | Mechanism |
//! |----------|---------|-----------|
//! | [`strategies::unsynchronized`] | no — lost updates | plain load + store read-modify-write |
//! | [`strategies::locked`] | yes | mutex held around each read-modify-write |
//! | [`strategies::concurrent`] | yes | sharded map with atomic per-key update |
//! | [`strategies::rcu`] | yes | immutable map swapped by compare-and-swap, retry on conflict |
//! | [`strategies::mailbox`] | yes | single owner thread draining a message queue |
//!
//! All five implement the [`aggregator::Aggregator`] trait: `increment(city)`
//! from any thread, `snapshot()` for a point-in-time copy. A snapshot never
//! observes a torn increment; taken after all producers are joined, it
//! reflects every retained increment exactly once.
//!
//! ## Quick Start
//!
//! ```rust
//! use presenze::aggregator::Strategy;
//! use presenze::workload::Workload;
//!
//! // 2 producers, 1000 check-ins each, alternating Cairo/Auckland.
//! let workload = Workload::new();
//!
//! // A correct strategy retains every check-in.
//! let counts = workload.run(Strategy::Locked.build().as_ref());
//! assert_eq!(counts.get("Cairo"), 1000);
//! assert_eq!(counts.get("Auckland"), 1000);
//!
//! // The unsynchronized one may come up short; it never overcounts.
//! let counts = workload.run(Strategy::Unsynchronized.build().as_ref());
//! assert!(counts.total() <= workload.expected_total());
//! ```
//!
//! ## Completion, Not Sleep
//!
//! The reader must not guess when producers are done. [`workload::Workload::run`]
//! joins every producer thread before taking the final snapshot; a fixed sleep
//! is not a synchronization contract and is not offered.
//!
//! ## Wrong Counts, Not Errors
//!
//! [`aggregator::Aggregator::increment`] and
//! [`aggregator::Aggregator::snapshot`] do not fail under documented use, so
//! they return no `Result`. The unsynchronized strategy's failure is a wrong
//! *count*, kept observable rather than wrapped in error handling.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | `Serialize`/`Deserialize` for [`counts::CheckInCounts`] |
//! | `json` | JSON ranking reports ([`report`]) |
//! | `demo` | everything the demo binary needs (`clap`, `tracing-subscriber`) |

pub mod aggregator;
pub mod counts;
pub mod strategies;
pub mod workload;

#[cfg(feature = "json")]
pub mod report;
