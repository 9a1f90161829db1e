//! frozen-hashmap: an immutable hash map materialized once from a finite
//! source, after which only lookups and iteration are permitted.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a closed-addressing table that trades all post-construction
//!   mutation for cheap, allocation-free reads.
//! - Layers:
//!   - RawTable<K, V>: structural layer owning the power-of-two bucket
//!     array and the slot vector; chains are slot indices, and every
//!     operation works on precomputed hashes. Only `K: Eq` runs here.
//!   - FrozenMap<K, V, S>: public API that hashes keys (via
//!     `S: BuildHasher`), drives the one-shot build, and exposes the
//!     read-only query and iteration surface.
//!
//! Constraints
//! - Build-once: every constructor consumes a full source sequence and
//!   returns `Result`; no API mutates an existing map.
//! - Unique keys: a key equal to one already frozen in aborts the build
//!   with `FreezeError::DuplicateKey` carrying the offending key.
//! - Sizing: bucket count is always a power of two, at least 8, computed
//!   from the source's size hint at a fixed 0.75 load factor with
//!   truncating division (see `table::capacity_for`); an undercounting
//!   hint is corrected by a full relink rehash mid-build.
//! - O(1) average lookups; worst case is one chain walk, bounded in
//!   expectation by the load factor.
//!
//! Hasher and rehashing invariants
//! - Each slot stores a precomputed `u64` hash and indexing always uses
//!   the stored hash; `K: Hash` is never invoked after insertion, so a
//!   rehash only rewrites chain links and never calls into user code.
//!
//! Concurrency
//! - No interior mutability anywhere: once built, every field is final.
//!   `FrozenMap` is therefore `Send`/`Sync` whenever `K`, `V`, `S` are,
//!   and concurrent lookups after safe publication need no locking.
//!
//! Notes and non-goals
//! - No `insert`/`remove`/`entry` surface; build a new map instead.
//! - No `FromIterator`: construction is fallible on duplicate keys, so
//!   the constructors return `Result` rather than panicking in `collect`.
//! - The throwing accessor is `Index` (panics with "key not found");
//!   `get`/`get_or`/`contains_key` are the non-panicking forms.
//! - Public API surface is `FrozenMap`, its iterators, and `FreezeError`;
//!   the structural layer is an implementation detail.

mod frozen_map;
mod frozen_map_proptest;
mod table;

// Public surface
pub use frozen_map::{FreezeError, FrozenMap, IntoIter, Iter, Keys, Values};
