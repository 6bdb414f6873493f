use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use ringcache_core::{RingCache, RingCacheError};

/// Hashes `key` with the standard library's `DefaultHasher`.
///
/// `DefaultHasher::new()` uses fixed keys, so the result is stable for the
/// life of the process. It is not guaranteed to be stable across Rust
/// releases, so do not persist shard indices computed with it.
///
/// # Examples
///
/// ```
/// use ringcache::default_hash;
///
/// assert_eq!(default_hash("user:42"), default_hash("user:42"));
/// ```
pub fn default_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Suggested shard count: the available parallelism of the machine.
///
/// Falls back to 1 when the parallelism cannot be determined.
pub fn default_shard_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Routing hash for a [`ShardedRingCache`].
///
/// Implemented for every `Fn(&Q) -> u64` closure or function, and for
/// [`DefaultShardHasher`], which hashes any `Q: Hash`.
///
/// Lookups through a borrowed form of the key (`&str` for a `String` key) need
/// the hasher to implement `ShardHasher` for that borrowed type too, and to
/// produce the same value for `k` and `k.borrow()`. `DefaultShardHasher`
/// satisfies this for every key type whose `Borrow` impl keeps `Hash`
/// consistent, as the `Borrow` contract requires. A closure only hashes the
/// one type it takes, so a closure-routed cache is queried with `&K`.
pub trait ShardHasher<Q: ?Sized> {
    fn hash_key(&self, key: &Q) -> u64;
}

impl<Q: ?Sized, F> ShardHasher<Q> for F
where
    F: Fn(&Q) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        self(key)
    }
}

/// Hashes keys with [`default_hash`].
///
/// ```
/// use ringcache::{default_hash, DefaultShardHasher, ShardHasher};
///
/// let hasher = DefaultShardHasher;
/// assert_eq!(hasher.hash_key("user:42"), default_hash(&"user:42".to_string()));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultShardHasher;

impl<Q: Hash + ?Sized> ShardHasher<Q> for DefaultShardHasher {
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        default_hash(key)
    }
}

/// A cache partitioned into independently locked [`RingCache`] shards.
///
/// Every key is routed to exactly one shard by `hash(key) % num_shards`.
/// `get`, `set` and `has` are forwarded unmodified to that shard, so each
/// shard keeps its own ring, cursor and lock. Threads working on keys that
/// route to different shards never contend.
///
/// # Capacity
///
/// Each shard holds `capacity / shards` entries (rounded down). The total
/// capacity is therefore `shards * (capacity / shards)`, which can be up to
/// `shards - 1` slots smaller than requested. Remainder slots are not
/// redistributed so every shard behaves identically.
///
/// Eviction is per shard: with a skewed hash, a shard can start evicting
/// while other shards still have free slots.
///
/// # Type Parameters
///
/// * `K` - The key type (`Eq + Hash + Clone`)
/// * `V` - The value type
/// * `H` - The routing hash: a [`ShardHasher`], usually a `Fn(&K) -> u64`
///   closure or [`DefaultShardHasher`]. Must be deterministic.
///
/// # Examples
///
/// ```
/// use ringcache::ShardedRingCache;
///
/// // 4 shards of 25 slots each, routed by the key itself
/// let cache = ShardedRingCache::new(100, 4, |k: &u64| *k);
///
/// assert!(cache.set(7, "seven"));
/// assert_eq!(cache.shard_index(&7), 3);
/// assert_eq!(cache.get(&7), Some("seven"));
/// assert!(cache.shard(&7).has(&7));
/// ```
///
/// With the default hasher, `String` keys can be looked up by `&str`:
///
/// ```
/// use ringcache::ShardedRingCache;
///
/// let cache: ShardedRingCache<String, u32> = ShardedRingCache::with_default_hasher(64, 4);
/// cache.set("user:1".to_string(), 1);
/// assert!(cache.has("user:1"));
/// assert_eq!(cache.get("user:1"), Some(1));
/// ```
pub struct ShardedRingCache<K, V, H = DefaultShardHasher> {
    shards: Box<[RingCache<K, V>]>,
    shard_capacity: usize,
    hash: H,
}

impl<K, V> ShardedRingCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a sharded cache routed by [`DefaultShardHasher`].
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`ShardedRingCache::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ringcache::{default_shard_count, ShardedRingCache};
    ///
    /// let shards = default_shard_count();
    /// let cache: ShardedRingCache<String, u32> =
    ///     ShardedRingCache::with_default_hasher(1024 * shards, shards);
    /// assert_eq!(cache.capacity(), 1024 * shards);
    /// ```
    pub fn with_default_hasher(capacity: usize, shards: usize) -> Self {
        match Self::try_with_default_hasher(capacity, shards) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`with_default_hasher`](Self::with_default_hasher).
    pub fn try_with_default_hasher(
        capacity: usize,
        shards: usize,
    ) -> Result<Self, RingCacheError> {
        Self::build(capacity, shards, DefaultShardHasher)
    }
}

impl<K, V, H> ShardedRingCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: ShardHasher<K>,
{
    /// Creates a sharded cache routed by a [`ShardHasher`] implementation.
    ///
    /// Use this instead of [`new`](Self::new) when the hasher is a type that
    /// also hashes borrowed forms of the key.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`ShardedRingCache::new`].
    pub fn with_hasher(capacity: usize, shards: usize, hasher: H) -> Self {
        match Self::try_with_hasher(capacity, shards, hasher) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible form of [`with_hasher`](Self::with_hasher).
    pub fn try_with_hasher(
        capacity: usize,
        shards: usize,
        hasher: H,
    ) -> Result<Self, RingCacheError> {
        Self::build(capacity, shards, hasher)
    }
}

impl<K, V, H> ShardedRingCache<K, V, H>
where
    K: Eq + Hash + Clone,
    H: Fn(&K) -> u64,
{
    /// Creates `shards` ring caches of `capacity / shards` slots each, routed
    /// by `hash`.
    ///
    /// # Panics
    ///
    /// Panics if `shards` is 0 or if `capacity / shards` is 0.
    /// Use [`try_new`](Self::try_new) for user-supplied configuration.
    pub fn new(capacity: usize, shards: usize, hash: H) -> Self {
        match Self::try_new(capacity, shards, hash) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates `shards` ring caches of `capacity / shards` slots each, routed
    /// by `hash`.
    ///
    /// # Errors
    ///
    /// - [`RingCacheError::ZeroShards`] if `shards` is 0
    /// - [`RingCacheError::ShardTooSmall`] if `capacity < shards`
    ///
    /// ```
    /// use ringcache::{RingCacheError, ShardedRingCache};
    ///
    /// let err = ShardedRingCache::<u64, u64>::try_with_default_hasher(3, 8)
    ///     .err()
    ///     .unwrap();
    /// assert_eq!(err, RingCacheError::ShardTooSmall { capacity: 3, shards: 8 });
    /// ```
    pub fn try_new(capacity: usize, shards: usize, hash: H) -> Result<Self, RingCacheError> {
        Self::build(capacity, shards, hash)
    }
}

impl<K, V, H> ShardedRingCache<K, V, H>
where
    K: Eq + Hash + Clone,
{
    fn build(capacity: usize, shards: usize, hash: H) -> Result<Self, RingCacheError> {
        if shards == 0 {
            return Err(RingCacheError::ZeroShards);
        }
        let shard_capacity = capacity / shards;
        if shard_capacity == 0 {
            return Err(RingCacheError::ShardTooSmall { capacity, shards });
        }

        let shards = (0..shards)
            .map(|_| RingCache::try_new(shard_capacity))
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();

        log::debug!(
            "creating sharded ring cache: {} shards x {} slots ({} of {} requested slots unused)",
            shards.len(),
            shard_capacity,
            capacity - shards.len() * shard_capacity,
            capacity
        );

        Ok(Self {
            shards,
            shard_capacity,
            hash,
        })
    }

    /// Index of the shard `key` routes to.
    #[inline]
    pub fn shard_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: ShardHasher<Q>,
    {
        (self.hash.hash_key(key) % self.shards.len() as u64) as usize
    }

    /// The shard `key` routes to.
    #[inline]
    pub fn shard<Q>(&self, key: &Q) -> &RingCache<K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        H: ShardHasher<Q>,
    {
        &self.shards[self.shard_index(key)]
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        H: ShardHasher<Q>,
    {
        self.shard(key).has(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        H: ShardHasher<Q>,
        V: Clone,
    {
        self.shard(key).get(key)
    }

    pub fn get_with<Q, T, F>(&self, key: &Q, f: F) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        H: ShardHasher<Q>,
        F: FnOnce(&V) -> T,
    {
        self.shard(key).get_with(key, f)
    }

    /// Inserts or updates `key` in its shard.
    ///
    /// Returns `true` when the key was newly inserted, `false` on update.
    /// See [`RingCache::set`].
    pub fn set(&self, key: K, value: V) -> bool
    where
        H: ShardHasher<K>,
    {
        self.shard(&key).set(key, value)
    }

    /// Visits every resident entry, shard by shard.
    ///
    /// Shards are visited in index order and each shard in its own ring order.
    /// Only one shard is locked at a time, so the result is not an atomic
    /// snapshot of the whole cache.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for shard in self.shards.iter() {
            shard.range(&mut visit);
        }
    }

    /// Like [`range`](Self::range), but only supplies the keys.
    pub fn range_keys<F>(&self, mut visit: F)
    where
        F: FnMut(&K),
    {
        for shard in self.shards.iter() {
            shard.range_keys(&mut visit);
        }
    }
}

impl<K, V, H> ShardedRingCache<K, V, H>
where
    K: Eq + Hash + Clone,
{
    /// All shards, in routing index order.
    pub fn shards(&self) -> &[RingCache<K, V>] {
        &self.shards
    }

    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    /// Slots per shard (`capacity / shards`, rounded down).
    pub fn shard_capacity(&self) -> usize {
        self.shard_capacity
    }

    /// Total slots across all shards.
    pub fn capacity(&self) -> usize {
        self.shard_capacity * self.shards.len()
    }

    /// Resident entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(RingCache::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(RingCache::is_empty)
    }

    /// New-key insertions summed over all shards.
    pub fn slots_allocated(&self) -> u64 {
        self.shards.iter().map(RingCache::slots_allocated).sum()
    }
}

impl<K, V, H> fmt::Debug for ShardedRingCache<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedRingCache")
            .field("num_shards", &self.shards.len())
            .field("shard_capacity", &self.shard_capacity)
            .field("shards", &self.shards)
            .finish()
    }
}
