use parwork::{par_sort_in, par_unique_in, WorkerPool};
use std::time::Instant;

fn xorshift_data(len: usize, mut state: u64) -> Vec<u32> {
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u32
        })
        .collect()
}

fn main() {
    let pool = WorkerPool::new();
    println!("workers: {}", pool.thread_count());

    let data = xorshift_data(1_000_000, 0x9E37_79B9_7F4A_7C15);

    let mut parallel = data.clone();
    let now = Instant::now();
    par_sort_in(&pool, &mut parallel);
    println!("parallel sort:    {:?}", now.elapsed());

    let mut sequential = data;
    let now = Instant::now();
    sequential.sort_unstable();
    println!("sequential sort:  {:?}", now.elapsed());
    assert_eq!(parallel, sequential);

    let mut duplicated: Vec<u32> = parallel.iter().map(|value| value % 4096).collect();
    duplicated.sort_unstable();

    let mut compacted = duplicated.clone();
    let now = Instant::now();
    let end = par_unique_in(&pool, &mut compacted);
    println!("parallel unique:  {:?} ({} survivors)", now.elapsed(), end);

    let now = Instant::now();
    duplicated.dedup();
    println!(
        "sequential dedup: {:?} ({} survivors)",
        now.elapsed(),
        duplicated.len()
    );
    assert_eq!(&compacted[..end], &duplicated[..]);

    let metrics = pool.metrics();
    println!(
        "tasks: {} completed, {} panicked, success rate {:.2}",
        metrics.completed,
        metrics.panicked,
        metrics.success_rate()
    );
}
