//! Synchronization strategies for the shared counts mapping.
//!
//! Each submodule implements [`Aggregator`](crate::aggregator::Aggregator)
//! with a different coordination mechanism. The implementations are
//! deliberately small: the point of keeping five of them side by side is to
//! compare what each mechanism does to the same read-modify-write, not to pick
//! a production counter (for that, use a sharded atomic counter crate).
//!
//! | Module | Mechanism | Retains every increment |
//! |--------|-----------|-------------------------|
//! | [`unsynchronized`] | plain load + store on per-key atomics | no |
//! | [`locked`] | `parking_lot::Mutex` around the whole map | yes |
//! | [`concurrent`] | `DashMap` atomic per-key entry update | yes |
//! | [`rcu`] | `ArcSwap` compare-and-swap of an immutable map | yes |
//! | [`mailbox`] | owner thread draining a `flume` channel | yes |
//!
//! Mixing strategies within one run is ruled out by construction: a strategy
//! is an aggregator instance, and producers only ever see the one instance
//! they were handed.

pub mod concurrent;
pub mod locked;
pub mod mailbox;
pub mod rcu;
pub mod unsynchronized;
