//! Tests for round-robin eviction through the public API
//!
//! These tests verify that eviction follows ring-slot order, that updates never
//! move a key, and that enumeration order is reproducible.

use ringcache::RingCache;

fn keys(cache: &RingCache<&'static str, i32>) -> Vec<&'static str> {
    let mut out = Vec::new();
    cache.range_keys(|k| out.push(*k));
    out
}

/// Inserting N+1 distinct keys into capacity N evicts exactly the first key
#[test]
fn test_first_key_evicted_after_wrap() {
    let cache = RingCache::new(4);
    for i in 0..=4 {
        assert!(cache.set(i, i));
    }

    assert!(!cache.has(&0));
    for i in 1..=4 {
        assert_eq!(cache.get(&i), Some(i));
    }
}

/// Full ring enumerates in slot order, not insertion order
#[test]
fn test_full_ring_slot_order() {
    let cache = RingCache::new(3);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);
    cache.set("d", 4);

    assert_eq!(keys(&cache), vec!["d", "b", "c"]);

    cache.set("e", 5);
    assert_eq!(keys(&cache), vec!["d", "e", "c"]);
}

/// Before the ring fills up, enumeration is insertion order
#[test]
fn test_partial_ring_insertion_order() {
    let cache = RingCache::new(5);
    cache.set("a", 1);
    cache.set("b", 2);
    assert_eq!(keys(&cache), vec!["a", "b"]);
}

/// Updating a key between inserts never evicts anything
#[test]
fn test_update_between_inserts_evicts_nothing() {
    let cache = RingCache::new(3);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);

    for v in 10..20 {
        assert!(!cache.set("b", v));
    }

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("b"), Some(19));
    assert_eq!(keys(&cache), vec!["a", "b", "c"]);
    assert_eq!(cache.slots_allocated(), 3);
}

/// Updated keys are still evicted on their original schedule
#[test]
fn test_updated_key_evicted_on_schedule() {
    let cache = RingCache::new(3);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);
    cache.set("a", 100);
    cache.set("d", 4);

    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.to_vec(), vec![("d", 4), ("b", 2), ("c", 3)]);
}

/// An evicted key that comes back is a new insertion in the next slot
#[test]
fn test_reinserted_key_takes_next_slot() {
    let cache = RingCache::new(2);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3); // evicts a, slot 0
    assert!(cache.set("a", 4)); // evicts b, slot 1

    assert_eq!(keys(&cache), vec!["c", "a"]);
    assert_eq!(cache.slots_allocated(), 4);
}

/// Capacity is never exceeded for a long, random workload
#[test]
fn test_capacity_bound_random_workload() {
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
    let cache = RingCache::new(50);

    for _ in 0..10_000 {
        let key = rng.u32(..500);
        cache.set(key, key);
        assert!(cache.len() <= 50);
    }

    cache.check_invariants().unwrap();
    let mut count = 0;
    cache.range(|k, v| {
        assert_eq!(k, v);
        count += 1;
    });
    assert_eq!(count, cache.len());
}

/// Repeated reads return the same results
#[test]
fn test_reads_are_idempotent() {
    let cache = RingCache::new(8);
    for i in 0..12u32 {
        cache.set(i, i * 2);
    }

    let snapshot = cache.to_vec();
    for _ in 0..3 {
        for i in 0..12u32 {
            assert_eq!(cache.has(&i), cache.get(&i).is_some());
        }
        assert_eq!(cache.to_vec(), snapshot);
    }
}
