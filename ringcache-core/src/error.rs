use thiserror::Error;

/// Errors reported by ringcache constructors and invariant checks.
///
/// Lookups never fail: an absent key is reported as `None` / `false`.
/// The only failures are configuration errors at construction time and,
/// from [`RingCache::check_invariants`](crate::RingCache::check_invariants),
/// a description of a broken internal invariant.
///
/// # Examples
///
/// ```
/// use ringcache_core::{RingCache, RingCacheError};
///
/// let err = RingCache::<u32, u32>::try_new(0).unwrap_err();
/// assert_eq!(err, RingCacheError::ZeroCapacity);
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingCacheError {
    /// A ring must have at least one slot.
    #[error("ring capacity must be greater than 0")]
    ZeroCapacity,

    /// A sharded cache must have at least one shard.
    #[error("shard count must be greater than 0")]
    ZeroShards,

    /// `capacity / shards` rounded down to zero slots per shard.
    #[error("capacity {capacity} is too small for {shards} shards (each shard needs at least 1 slot)")]
    ShardTooSmall { capacity: usize, shards: usize },

    /// An internal consistency check failed.
    #[error("ring invariant violated: {0}")]
    Invariant(String),
}
