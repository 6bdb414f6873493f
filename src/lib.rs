//! # Ringcache
//!
//! Fixed-capacity, thread-safe caches with deterministic round-robin eviction.
//!
//! ## Features
//!
//! - **Bounded**: A cache never holds more than its capacity
//! - **Round-robin eviction**: Once full, every new key evicts the key in the
//!   next ring slot. Reads and updates never change the eviction order
//! - **Thread-safe**: One `parking_lot::RwLock` per cache; readers run concurrently
//! - **Sharded variant**: [`ShardedRingCache`] splits one cache into
//!   independently locked shards to reduce contention
//! - **Deterministic scans**: `range` and `range_keys` enumerate in slot order
//!
//! ## Quick Start
//!
//! ```rust
//! use ringcache::RingCache;
//!
//! let cache = RingCache::new(3);
//!
//! // `set` returns true for a new key, false for an update
//! assert!(cache.set("a", 1));
//! assert!(!cache.set("a", 2));
//! assert_eq!(cache.get("a"), Some(2));
//!
//! cache.set("b", 3);
//! cache.set("c", 4);
//! cache.set("d", 5); // ring wraps: "a" is evicted
//! assert!(!cache.has("a"));
//! ```
//!
//! ## Sharding
//!
//! ```rust
//! use ringcache::{default_shard_count, ShardedRingCache};
//!
//! let shards = default_shard_count();
//! let cache: ShardedRingCache<u64, String> =
//!     ShardedRingCache::with_default_hasher(10_000, shards);
//!
//! cache.set(42, "answer".to_string());
//! assert_eq!(cache.get(&42), Some("answer".to_string()));
//! assert!(cache.capacity() <= 10_000);
//! ```
//!
//! ## Logging
//!
//! Construction and the moment a ring first fills up are reported at `debug`
//! level through the [`log`](https://docs.rs/log) facade; evictions at `trace`.
//! No logger is installed by this crate.

mod sharded;

pub use ringcache_core::*;
pub use sharded::{
    default_hash, default_shard_count, DefaultShardHasher, ShardHasher, ShardedRingCache,
};
