//! Benchmarks for the concurrency-limiting primitives.
//!
//! Covers the uncontended fast paths, the contended FIFO hand-off, and
//! batch submission through the task pool.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tokio::runtime::Runtime;

use taskgate::{Semaphore, TaskPool};

fn bench_try_acquire_uncontended(c: &mut Criterion) {
    let sem = Semaphore::new(1024).unwrap();
    c.bench_function("semaphore/try_acquire_release", |b| {
        b.iter(|| {
            let mut permit = sem.try_acquire().unwrap();
            black_box(permit.release());
        });
    });
}

fn bench_acquire_uncontended(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let sem = Semaphore::new(64).unwrap();
    c.bench_function("semaphore/acquire_release_async", |b| {
        b.to_async(&rt).iter(|| {
            let sem = sem.clone();
            async move {
                let permit = sem.acquire().await;
                drop(black_box(permit));
            }
        });
    });
}

fn bench_contended_handoff(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    c.bench_function("semaphore/contended_handoff_8_over_1", |b| {
        b.to_async(&rt).iter(|| async {
            let sem = Semaphore::new(1).unwrap();
            let mut workers = Vec::new();
            for _ in 0..8 {
                let sem = sem.clone();
                workers.push(tokio::spawn(async move {
                    sem.run(|| async { tokio::task::yield_now().await }).await;
                }));
            }
            for worker in workers {
                worker.await.unwrap();
            }
        });
    });
}

fn bench_pool_submit_all(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("task_pool");
    for concurrency in [1_usize, 4, 16] {
        group.throughput(Throughput::Elements(64));
        group.bench_with_input(
            BenchmarkId::new("submit_all_64", concurrency),
            &concurrency,
            |b, &concurrency| {
                b.to_async(&rt).iter(|| async move {
                    let pool = TaskPool::new(concurrency).unwrap();
                    let tasks: Vec<_> = (0..64_u32)
                        .map(|i| move || async move { Ok::<u32, ()>(black_box(i)) })
                        .collect();
                    let results = pool.submit_all(tasks).await.unwrap();
                    black_box(results)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_try_acquire_uncontended,
    bench_acquire_uncontended,
    bench_contended_handoff,
    bench_pool_submit_all
);
criterion_main!(benches);
