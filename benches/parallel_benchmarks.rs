use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use parwork::{par_sort_in, par_unique_in, WorkerPool};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

// Benchmark 1: submission and barrier overhead for trivial tasks
fn bench_submission_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("submission_throughput");

    for task_count in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(task_count as u64));
        group.bench_with_input(
            BenchmarkId::new("submit_wait", task_count),
            &task_count,
            |b, &count| {
                let pool = WorkerPool::new();
                b.iter(|| {
                    for value in 0..count {
                        pool.submit(move || {
                            black_box(value);
                        });
                    }
                    pool.wait();
                });
            },
        );
    }

    group.finish();
}

// Benchmark 2: parallel sort vs sequential std sort across input shapes
fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    group.sample_size(20);

    let len = 1_000_000usize;
    group.throughput(Throughput::Elements(len as u64));

    let mut rng = StdRng::seed_from_u64(0xDECAF);
    let random: Vec<u32> = (0..len).map(|_| rng.gen()).collect();
    let sorted: Vec<u32> = {
        let mut values = random.clone();
        values.sort_unstable();
        values
    };
    let duplicate_heavy: Vec<u32> = random.iter().map(|value| value % 100).collect();

    for (shape, input) in [
        ("random", &random),
        ("sorted", &sorted),
        ("duplicate_heavy", &duplicate_heavy),
    ] {
        group.bench_with_input(BenchmarkId::new("parallel", shape), input, |b, input| {
            let pool = WorkerPool::new();
            b.iter_batched(
                || input.to_vec(),
                |mut data| par_sort_in(&pool, black_box(&mut data)),
                BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("sequential", shape), input, |b, input| {
            b.iter_batched(
                || input.to_vec(),
                |mut data| black_box(&mut data).sort_unstable(),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// Benchmark 3: parallel unique vs sequential dedup on sorted input
fn bench_unique(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique");
    group.sample_size(20);

    let len = 1_000_000usize;
    group.throughput(Throughput::Elements(len as u64));

    let mut rng = StdRng::seed_from_u64(0xFEED);
    let mut input: Vec<u32> = (0..len).map(|_| rng.gen_range(0..65_536u32)).collect();
    input.sort_unstable();

    group.bench_function("parallel", |b| {
        let pool = WorkerPool::new();
        b.iter_batched(
            || input.clone(),
            |mut data| black_box(par_unique_in(&pool, &mut data)),
            BatchSize::LargeInput,
        );
    });
    group.bench_function("sequential_dedup", |b| {
        b.iter_batched(
            || input.clone(),
            |mut data| {
                data.dedup();
                black_box(data.len())
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_submission_throughput,
    bench_sort,
    bench_unique
);
criterion_main!(benches);
