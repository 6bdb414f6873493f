use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ringcache_core::RingCache;
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

fn bench_insert_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_sequential");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("fill", size), size, |b, &size| {
            b.iter(|| {
                let cache = RingCache::new(size);
                for i in 0..size {
                    cache.set(format!("key{}", i), black_box(i as i32));
                }
            });
        });
    }

    group.finish();
}

fn bench_insert_wrapping(c: &mut Criterion) {
    // Steady-state inserts into a full ring: every set evicts
    let cache = RingCache::new(100_000);
    let mut next = 0u64;

    c.bench_function("insert_wrapping_100k", |b| {
        b.iter(|| {
            cache.set(next, black_box(next));
            next += 1;
        });
    });
}

fn bench_update_in_place(c: &mut Criterion) {
    let cache = RingCache::new(1000);
    for i in 0..1000u64 {
        cache.set(i, i);
    }

    c.bench_function("update_in_place", |b| {
        b.iter(|| {
            for i in 0..1000u64 {
                black_box(cache.set(i, i + 1));
            }
        });
    });
}

fn bench_get_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_sequential");

    for size in [10, 100, 1000].iter() {
        let cache = RingCache::new(*size);
        for i in 0..*size {
            cache.set(format!("key{}", i), i as i32);
        }

        group.bench_with_input(BenchmarkId::new("hit", size), size, |b, &size| {
            b.iter(|| {
                for i in 0..size {
                    black_box(cache.get(format!("key{}", i).as_str()));
                }
            });
        });
    }

    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("range");

    for size in [100, 1000, 10_000].iter() {
        let cache = RingCache::new(*size);
        for i in 0..(*size as u64 * 3 / 2) {
            cache.set(i, i);
        }

        group.bench_with_input(BenchmarkId::new("entries", size), size, |b, _| {
            b.iter(|| {
                let mut sum = 0u64;
                cache.range(|_, v| sum += v);
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("keys", size), size, |b, _| {
            b.iter(|| {
                let mut count = 0usize;
                cache.range_keys(|_| count += 1);
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_concurrent_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_reads");

    let cache = Arc::new(RingCache::new(1000));
    for i in 0..1000u64 {
        cache.set(i, i);
    }

    for num_threads in [2, 4, 8, 16].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|_| {
                            let cache = Arc::clone(&cache);
                            thread::spawn(move || {
                                // Shared lock only: readers never wait on each other
                                for i in 0..100u64 {
                                    black_box(cache.get(&i));
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_read_heavy_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_heavy_workload");

    // 90% reads, 10% writes
    for num_threads in [2u64, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::new("90_read_10_write", num_threads),
            num_threads,
            |b, &num_threads| {
                let cache = Arc::new(RingCache::new(100));
                b.iter(|| {
                    let handles: Vec<_> = (0..num_threads)
                        .map(|thread_id| {
                            let cache = Arc::clone(&cache);
                            thread::spawn(move || {
                                for i in 0..100u64 {
                                    if i % 10 == 0 {
                                        cache.set(thread_id * 100 + i, black_box(i));
                                    } else {
                                        black_box(cache.get(&(i % 50)));
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_sequential,
    bench_insert_wrapping,
    bench_update_in_place,
    bench_get_sequential,
    bench_range,
    bench_concurrent_reads,
    bench_read_heavy_workload
);
criterion_main!(benches);
