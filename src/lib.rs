//! chain-hashmap: a separate-chaining hash table shared by a map and a set,
//! with size-class resizing and multiway set algebra.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one engine, two shapes. `ChainTable<K, P, S>` holds a key and a
//!   payload per entry; `ChainHashMap` uses the value as payload and
//!   `ChainHashSet` uses `()`, so a set never carries a value slot.
//! - Layers:
//!   - EntryStore<K, P>: slot-map arena of chain nodes; generational keys
//!     double as chain links, so no node is boxed on its own.
//!   - ChainTable<K, P, S>: bucket array of chain heads, resize policy,
//!     insert/lookup/remove, sweep and copy.
//!   - Set algebra: union, intersection, difference and symmetric
//!     difference over an optional accumulator plus any number of operands,
//!     and the disjoint/equal/subset/superset predicates.
//!   - ChainHashMap / ChainHashSet: thin owners of one `ChainTable`.
//!
//! Constraints
//! - Single-threaded; no internal locking.
//! - Hashing and equality come from a `KeyStrategy` fixed at construction.
//!   Each entry caches its 32-bit hash; chains compare cached hashes before
//!   calling `eq`, and rehashing never calls the strategy.
//! - Unchecked `insert` requires an absent key unless duplicates are
//!   enabled; debug builds assert it.
//!
//! Sizing
//! - Bucket counts come from a fixed ascending list of near-primes
//!   (5 up to 268435459); bucket = hash % bucket count.
//! - Grow above 3/4 of the bucket count, shrink below 3/16 of it. Between
//!   the two nothing happens, so alternating insert/remove at a boundary
//!   never thrashes.
//! - Shrinking on removal is opt-in (`allow_shrink`). Bulk removals by the
//!   set operations always shrink. A reserve hint sets a floor the table
//!   never shrinks below.
//!
//! Set algebra
//! - Operands must share a strategy; cached hashes are compared across
//!   tables.
//! - The accumulator is never walked while it is being changed: removals
//!   happen in one sweep per operand that tallies removed entries and fixes
//!   up the count and size afterwards.
//! - Symmetric difference first records which keys the later operands hold
//!   once or several times, in transient tables of key references, then
//!   reconciles the accumulator against them.
//!
//! Notes and non-goals
//! - No ordered iteration, persistence or thread-safety.
//! - `quality()` reports how well a strategy spreads real keys.

mod algebra;
pub mod config;
mod entry_store;
pub mod error;
pub mod iter;
pub mod map;
mod quality;
pub mod set;
pub mod size_class;
pub mod strategy;
pub mod table;
mod table_proptest;

// Public surface
pub use config::{TableConfig, TableFlags};
pub use error::InsertError;
pub use map::ChainHashMap;
pub use quality::Quality;
pub use set::ChainHashSet;
pub use strategy::{
    DefaultStrategy, Djb2, Djb2Prefix, Hashed, IntMix, KeyStrategy, Murmur2, Pair, PtrIdentity, Uint4,
};
pub use table::{ChainTable, InsertOutcome};
