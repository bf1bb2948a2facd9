//! Basic benchmarks for the `fixed_pool` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use fixed_pool::FixedPool;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

type TestItem = Vec<u8>;
const CAPACITY: usize = 1024;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_basic");

    group.bench_function("build", |b| {
        b.iter(|| drop(black_box(FixedPool::<TestItem>::new(CAPACITY).unwrap())));
    });

    group.bench_function("acquire_release", |b| {
        let mut pool = FixedPool::<TestItem>::new(CAPACITY).unwrap();

        b.iter(|| {
            let item = black_box(pool.acquire().unwrap());
            pool.release_owned(item).unwrap();
        });
    });

    group.bench_function("acquire_release_with_hooks", |b| {
        let mut pool = FixedPool::<TestItem>::builder()
            .capacity(CAPACITY)
            .on_acquired(|item| item.push(1))
            .on_released(Vec::clear)
            .build()
            .unwrap();

        b.iter(|| {
            let item = black_box(pool.acquire().unwrap());
            pool.release_owned(item).unwrap();
        });
    });

    group.bench_function("iter_half_full", |b| {
        let mut pool = FixedPool::<TestItem>::new(CAPACITY).unwrap();

        let handles: Vec<_> = (0..CAPACITY / 2)
            .map(|_| pool.acquire().unwrap())
            .collect();

        b.iter(|| black_box(pool.iter().map(Vec::len).sum::<usize>()));

        for handle in handles {
            pool.release_owned(handle).unwrap();
        }
    });

    group.finish();
}
