//! Criterion benchmark untuk SPSC Ring
//!
//! - drain: biaya `pop` vs `pop_into(None)` untuk mengosongkan ring penuh
//! - predicates: biaya `is_full` / `is_empty` / `len`
//! - handles: push/pop lewat `Ring` langsung vs lewat `Producer`/`Consumer`
//! - cross_thread: transfer nyata antara dua thread
//!
//! Run dengan: cargo bench

use std::thread;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use spsc_ring::{Ring, Value};

/// Ring yang sudah terisi sampai penuh
fn filled_ring(capacity: usize) -> Ring {
    let mut rb = Ring::new(capacity).unwrap();
    let mut i: Value = 0;
    while rb.push(i).is_ok() {
        i += 1;
    }
    rb
}

fn bench_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain");

    for capacity in [64usize, 4096] {
        group.throughput(Throughput::Elements((capacity - 1) as u64));

        group.bench_function(format!("pop_cap_{}", capacity), |b| {
            b.iter_batched_ref(
                || filled_ring(capacity),
                |rb| {
                    while let Ok(v) = rb.pop() {
                        black_box(v);
                    }
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("pop_into_none_cap_{}", capacity), |b| {
            b.iter_batched_ref(
                || filled_ring(capacity),
                |rb| while rb.pop_into(black_box(None)).is_ok() {},
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicates");

    let mut rb = Ring::new(1024).unwrap();
    for i in 0..512 {
        let _ = rb.push(i);
    }
    let rb = black_box(rb);

    group.bench_function("is_full", |b| b.iter(|| black_box(rb.is_full())));
    group.bench_function("is_empty", |b| b.iter(|| black_box(rb.is_empty())));
    group.bench_function("len", |b| b.iter(|| black_box(rb.len())));

    group.finish();
}

fn bench_handles(c: &mut Criterion) {
    let mut group = c.benchmark_group("handles");
    group.throughput(Throughput::Elements(1));

    group.bench_function("ring_push_pop", |b| {
        let mut rb = Ring::new(256).unwrap();
        let mut i: Value = 0;
        b.iter(|| {
            let _ = rb.push(black_box(i));
            black_box(rb.pop().ok());
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("split_push_pop", |b| {
        let mut rb = Ring::new(256).unwrap();
        let (mut tx, mut rx) = rb.split();
        let mut i: Value = 0;
        b.iter(|| {
            let _ = tx.push(black_box(i));
            black_box(rx.pop().ok());
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

fn bench_cross_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_thread");
    const COUNT: Value = 100_000;
    group.throughput(Throughput::Elements(COUNT as u64));

    for capacity in [2usize, 64, 1024] {
        group.bench_function(format!("transfer_cap_{}", capacity), |b| {
            let mut rb = Ring::new(capacity).unwrap();
            b.iter(|| {
                let (mut tx, mut rx) = rb.split();
                thread::scope(|s| {
                    s.spawn(move || {
                        for i in 0..COUNT {
                            while tx.push(i).is_err() {
                                std::hint::spin_loop();
                            }
                        }
                    });
                    let mut received = 0;
                    while received < COUNT {
                        match rx.pop() {
                            Ok(v) => {
                                black_box(v);
                                received += 1;
                            }
                            Err(_) => std::hint::spin_loop(),
                        }
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_drain,
    bench_predicates,
    bench_handles,
    bench_cross_thread
);
criterion_main!(benches);
