//! # Ringcache Core
//!
//! Core building block of the ringcache library: a fixed-capacity,
//! thread-safe associative cache with deterministic round-robin eviction.
//!
//! ## Features
//!
//! - **Fixed capacity**: The number of slots is set once at construction
//! - **Round-robin eviction**: New keys take ring slots in order; once every
//!   slot has been used, each new key evicts the key in the next slot
//! - **Update in place**: Overwriting a key keeps its slot (not LRU)
//! - **Deterministic enumeration**: `range` visits entries in slot order
//! - **Read-mostly locking**: A single `parking_lot::RwLock` per cache
//!
//! ## Module Organization
//!
//! - [`ring_cache`] - The `RingCache` type and its slot-allocation algorithm
//! - [`slot_entry`] - Value wrapper recording the slot a key occupies
//! - [`error`] - Construction and invariant errors
//!
//! ## Example
//!
//! ```
//! use ringcache_core::RingCache;
//!
//! let cache = RingCache::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3); // evicts "a"
//!
//! assert!(!cache.has("a"));
//! assert_eq!(cache.slots_allocated(), 3);
//! ```
pub mod error;
pub mod ring_cache;
pub mod slot_entry;

pub use error::RingCacheError;
pub use ring_cache::RingCache;
pub use slot_entry::SlotEntry;
