//! Fixed-size worker pool with a quiescence barrier, plus parallel slice
//! algorithms built on top of it.
//!
//! # Features
//! - FIFO task queue over long-lived worker threads, non-blocking submission
//! - Race-free `wait()` barrier, correct while tasks submit further tasks
//! - Per-call opt-in result handles with panic capture
//! - Parallel unstable quicksort with a sequential cutoff
//! - Parallel duplicate compaction over pre-sorted slices
//! - Panic isolation at the task boundary and pool-level counters
//!
//! ```
//! use parwork::WorkerPool;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = WorkerPool::with_threads(4);
//! let counter = Arc::new(AtomicUsize::new(0));
//! for _ in 0..100 {
//!     let counter = Arc::clone(&counter);
//!     pool.submit(move || {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     });
//! }
//! pool.wait();
//! assert_eq!(counter.load(Ordering::Relaxed), 100);
//! ```

pub mod errors;
pub mod handle;
pub mod metrics;
pub mod pool;
pub mod sort;
pub mod unique;

pub use errors::TaskError;
pub use handle::{TaskHandle, TaskResult};
pub use metrics::PoolMetrics;
pub use pool::{Config, WorkerPool};
pub use sort::{par_sort, par_sort_by, par_sort_by_in, par_sort_in};
pub use unique::{par_unique, par_unique_by, par_unique_by_in, par_unique_in};
