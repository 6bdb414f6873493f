use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::{RingCacheError, SlotEntry};

/// A fixed-capacity, thread-safe cache with round-robin slot eviction.
///
/// The cache owns `capacity` ring slots. Every *new* key takes the next slot
/// in ring order; once every slot has been used, a new key overwrites the
/// key currently occupying that slot. Updating an existing key keeps its
/// slot, so eviction is strictly by first-insertion order and never by
/// access recency.
///
/// # Type Parameters
///
/// * `K` - The key type. Needs `Eq + Hash` for the lookup table and `Clone`
///   because each resident key is also recorded in its ring slot.
/// * `V` - The value type. Only [`get`](Self::get) and [`to_vec`](Self::to_vec)
///   require `V: Clone`.
///
/// # Thread Safety
///
/// All state lives behind a single `parking_lot::RwLock`:
/// - `has`, `get`, `get_with`, `range`, `range_keys`, `slots_allocated` and
///   the size accessors take the lock in shared mode and never block each other
/// - `set` takes the lock in exclusive mode, so writes are serialized
/// - guards are scoped, so the lock is released on every exit path, including
///   a panic raised by a `range` visitor
///
/// `parking_lot` locks are not poisoned, so a panic in one thread never makes
/// the cache unusable for the others.
///
/// # Examples
///
/// ```
/// use ringcache_core::RingCache;
///
/// let cache = RingCache::new(3);
/// assert!(cache.set("a", 1));
/// assert!(cache.set("b", 2));
/// assert!(cache.set("c", 3));
///
/// // Updating an existing key is not a new insertion
/// assert!(!cache.set("a", 10));
/// assert_eq!(cache.get("a"), Some(10));
///
/// // The ring is full: "d" takes slot 0 and evicts "a"
/// assert!(cache.set("d", 4));
/// assert!(!cache.has("a"));
///
/// let mut keys = Vec::new();
/// cache.range_keys(|k| keys.push(*k));
/// assert_eq!(keys, vec!["d", "b", "c"]);
/// ```
pub struct RingCache<K, V> {
    capacity: usize,
    state: RwLock<RingState<K, V>>,
}

struct RingState<K, V> {
    entries: HashMap<K, SlotEntry<V>>,
    ring: Vec<Option<K>>,
    next_slot: usize,
    full: bool,
    slots_allocated: u64,
}

impl<K, V> RingState<K, V>
where
    K: Eq + Hash + Clone,
{
    fn with_capacity(capacity: usize) -> Self {
        let mut ring = Vec::with_capacity(capacity);
        ring.resize_with(capacity, || None);
        Self {
            entries: HashMap::with_capacity(capacity),
            ring,
            next_slot: 0,
            full: false,
            slots_allocated: 0,
        }
    }

    /// Slots that have been written at least once, in ring order.
    fn occupied(&self) -> &[Option<K>] {
        if self.full {
            &self.ring
        } else {
            &self.ring[..self.next_slot]
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.occupied()
            .iter()
            .flatten()
            .filter_map(move |key| self.entries.get(key).map(|entry| (key, &entry.value)))
    }

    fn insert(&mut self, key: K, value: V) -> bool {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.replace(value);
            return false;
        }

        let capacity = self.ring.len();
        let slot = self.next_slot;

        if self.full {
            if let Some(victim) = self.ring[slot].take() {
                self.entries.remove(&victim);
                log::trace!("evicted key from ring slot {slot}");
            }
        }

        self.entries.insert(key.clone(), SlotEntry::new(value, slot));
        self.ring[slot] = Some(key);
        self.next_slot = (slot + 1) % capacity;
        self.slots_allocated += 1;

        if !self.full && slot == capacity - 1 {
            self.full = true;
            log::debug!("ring of capacity {capacity} is full, new keys now evict in slot order");
        }

        true
    }

    fn check(&self) -> Result<(), String> {
        let capacity = self.ring.len();

        if self.entries.len() > capacity {
            return Err(format!(
                "{} entries exceed capacity {capacity}",
                self.entries.len()
            ));
        }
        if self.next_slot >= capacity {
            return Err(format!(
                "next slot {} is outside the ring of {capacity}",
                self.next_slot
            ));
        }
        if self.slots_allocated % capacity as u64 != self.next_slot as u64 {
            return Err(format!(
                "{} allocations do not land on next slot {}",
                self.slots_allocated, self.next_slot
            ));
        }
        if !self.full && self.slots_allocated >= capacity as u64 {
            return Err(format!(
                "{} allocations into {capacity} slots but ring is not full",
                self.slots_allocated
            ));
        }

        for (slot, key) in self.ring.iter().enumerate() {
            let written = self.full || slot < self.next_slot;
            match (written, key) {
                (true, None) => return Err(format!("written slot {slot} is empty")),
                (false, Some(_)) => return Err(format!("unwritten slot {slot} holds a key")),
                (true, Some(key)) => match self.entries.get(key) {
                    Some(entry) if entry.slot == slot => {}
                    Some(entry) => {
                        return Err(format!(
                            "slot {slot} holds a key whose entry points at slot {}",
                            entry.slot
                        ))
                    }
                    None => return Err(format!("slot {slot} holds a key with no entry")),
                },
                (false, None) => {}
            }
        }

        let occupied = self.occupied().len();
        if occupied != self.entries.len() {
            return Err(format!(
                "{occupied} occupied slots but {} entries",
                self.entries.len()
            ));
        }

        Ok(())
    }
}

impl<K, V> RingCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache with `capacity` ring slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. Use [`try_new`](Self::try_new) when the
    /// capacity comes from user configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringcache_core::RingCache;
    ///
    /// let cache: RingCache<String, u64> = RingCache::new(1024);
    /// assert_eq!(cache.capacity(), 1024);
    /// assert!(cache.is_empty());
    /// ```
    ///
    /// ```should_panic
    /// use ringcache_core::RingCache;
    ///
    /// let _cache: RingCache<u32, u32> = RingCache::new(0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates an empty cache with `capacity` ring slots.
    ///
    /// # Errors
    ///
    /// Returns [`RingCacheError::ZeroCapacity`] if `capacity` is 0.
    pub fn try_new(capacity: usize) -> Result<Self, RingCacheError> {
        if capacity == 0 {
            return Err(RingCacheError::ZeroCapacity);
        }
        log::debug!("creating ring cache with {capacity} slots");
        Ok(Self {
            capacity,
            state: RwLock::new(RingState::with_capacity(capacity)),
        })
    }

    /// Returns `true` if `key` is resident.
    ///
    /// Takes the shared lock; any number of callers may run concurrently.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.read().entries.contains_key(key)
    }

    /// Retrieves a clone of the value stored for `key`.
    ///
    /// Returns `None` if the key is not resident. Reading a key never changes
    /// its position in the ring.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringcache_core::RingCache;
    ///
    /// let cache = RingCache::new(4);
    /// cache.set("user:1".to_string(), "alice".to_string());
    ///
    /// assert_eq!(cache.get("user:1"), Some("alice".to_string()));
    /// assert_eq!(cache.get("user:2"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.state
            .read()
            .entries
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// Applies `f` to the value stored for `key` while holding the shared lock.
    ///
    /// Useful when `V` is expensive to clone or not `Clone` at all.
    ///
    /// ```
    /// use ringcache_core::RingCache;
    ///
    /// let cache = RingCache::new(2);
    /// cache.set(1, vec![1u8; 4096]);
    /// assert_eq!(cache.get_with(&1, |bytes| bytes.len()), Some(4096));
    /// assert_eq!(cache.get_with(&2, |bytes| bytes.len()), None);
    /// ```
    pub fn get_with<Q, T, F>(&self, key: &Q, f: F) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> T,
    {
        self.state.read().entries.get(key).map(|entry| f(&entry.value))
    }

    /// Inserts or updates `key`.
    ///
    /// Returns `true` when `key` was newly inserted and `false` when an
    /// existing entry was updated in place.
    ///
    /// # Behavior
    ///
    /// - **Existing key**: the value is replaced, the key keeps its slot and
    ///   the ring cursor does not move. Nothing is evicted.
    /// - **New key**: the key takes the slot under the ring cursor. If the
    ///   ring is full, the key previously occupying that slot is evicted.
    ///   The cursor then advances by one, wrapping at `capacity`.
    ///
    /// # Thread Safety
    ///
    /// Takes the exclusive lock; concurrent readers and writers wait until
    /// the call returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringcache_core::RingCache;
    ///
    /// let cache = RingCache::new(2);
    /// assert!(cache.set("k1", 1));
    /// assert!(cache.set("k2", 2));
    /// assert!(!cache.set("k1", 11)); // update, k1 keeps slot 0
    ///
    /// assert!(cache.set("k3", 3));   // takes slot 0, evicts k1
    /// assert_eq!(cache.get("k1"), None);
    /// assert_eq!(cache.get("k2"), Some(2));
    /// assert_eq!(cache.get("k3"), Some(3));
    /// ```
    pub fn set(&self, key: K, value: V) -> bool {
        self.state.write().insert(key, value)
    }

    /// Total number of `set` calls that inserted a new key.
    ///
    /// Monotonic for the life of the cache; updates are not counted and the
    /// counter keeps growing after the ring wraps.
    pub fn slots_allocated(&self) -> u64 {
        self.state.read().slots_allocated
    }

    /// Visits every resident entry exactly once.
    ///
    /// # Order
    ///
    /// - Before the ring is full, entries are visited in insertion order
    ///   (slots `0..next_slot`).
    /// - Once the ring is full, entries are visited in slot order
    ///   `0..capacity`, which is generally not insertion order.
    ///
    /// The order depends only on the cache state, so two calls without an
    /// intervening `set` visit the same sequence.
    ///
    /// # Locking
    ///
    /// The shared lock is held for the whole enumeration. The visitor must not
    /// call back into the same cache. If the visitor panics, the panic
    /// propagates to the caller and the lock is released during unwinding.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringcache_core::RingCache;
    ///
    /// let cache = RingCache::new(3);
    /// for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
    ///     cache.set(k, v);
    /// }
    ///
    /// let mut seen = Vec::new();
    /// cache.range(|k, v| seen.push((*k, *v)));
    /// assert_eq!(seen, vec![("d", 4), ("b", 2), ("c", 3)]);
    /// ```
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        let state = self.state.read();
        for (key, value) in state.iter() {
            visit(key, value);
        }
    }

    /// Like [`range`](Self::range), but only supplies the keys.
    pub fn range_keys<F>(&self, mut visit: F)
    where
        F: FnMut(&K),
    {
        let state = self.state.read();
        for key in state.occupied().iter().flatten() {
            visit(key);
        }
    }

    /// Like [`range`](Self::range), with a fallible visitor.
    ///
    /// Enumeration stops at the first `Err`, which is returned unchanged.
    ///
    /// ```
    /// use ringcache_core::RingCache;
    ///
    /// let cache = RingCache::new(4);
    /// cache.set(1, "one");
    /// cache.set(2, "two");
    /// cache.set(3, "three");
    ///
    /// let mut visited = 0;
    /// let result = cache.try_range(|k, _| {
    ///     visited += 1;
    ///     if *k == 2 { Err("stop") } else { Ok(()) }
    /// });
    /// assert_eq!(result, Err("stop"));
    /// assert_eq!(visited, 2);
    /// ```
    pub fn try_range<E, F>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&K, &V) -> Result<(), E>,
    {
        let state = self.state.read();
        for (key, value) in state.iter() {
            visit(key, value)?;
        }
        Ok(())
    }

    /// Snapshot of all resident entries in [`range`](Self::range) order.
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let state = self.state.read();
        state
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Number of ring slots, fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once every slot has been written at least once.
    ///
    /// Never reverts to `false`.
    pub fn is_full(&self) -> bool {
        self.state.read().full
    }

    /// Verifies the internal consistency of the ring and lookup table.
    ///
    /// Intended for tests and debugging; walks every slot under the shared lock.
    ///
    /// # Errors
    ///
    /// Returns [`RingCacheError::Invariant`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), RingCacheError> {
        self.state.read().check().map_err(RingCacheError::Invariant)
    }
}

impl<K, V> fmt::Debug for RingCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("RingCache")
            .field("capacity", &self.capacity)
            .field("len", &state.entries.len())
            .field("next_slot", &state.next_slot)
            .field("full", &state.full)
            .field("slots_allocated", &state.slots_allocated)
            .finish()
    }
}
