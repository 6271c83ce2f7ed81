use super::{
    handle::{TaskHandle, TaskResult},
    pool::WorkerPool,
};
use std::{slice, sync::Arc};

struct UniqueCtx<T, F> {
    base: *mut T,
    eq: F,
}

// Chunk tasks share the context read-only and write pairwise disjoint
// element ranges through `base`.
unsafe impl<T: Send, F: Send + Sync> Send for UniqueCtx<T, F> {}
unsafe impl<T: Send, F: Send + Sync> Sync for UniqueCtx<T, F> {}

/// Removes adjacent duplicates in place, compacting survivors to the front
/// by swapping so the tail stays valid. Returns the surviving count.
fn dedup_adjacent<T, F>(range: &mut [T], eq: &F) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    if range.is_empty() {
        return 0;
    }
    let mut write = 1;
    for read in 1..range.len() {
        if !eq(&range[read], &range[write - 1]) {
            if read != write {
                range.swap(write, read);
            }
            write += 1;
        }
    }
    write
}

/// Compacts a pre-sorted slice so every run of equal elements keeps one
/// representative, returning the new logical length. Elements past it are
/// unspecified but remain valid (compaction swaps, it never drops).
///
/// The slice must already be sorted so equal elements are contiguous; the
/// precondition is documented, not checked. Runs on a pool sized to
/// `min(host concurrency, data.len())`.
///
/// ```
/// let mut data = vec![1, 1, 2, 2, 2, 3];
/// let end = parwork::par_unique(&mut data);
/// assert_eq!(&data[..end], [1, 2, 3]);
/// ```
pub fn par_unique<T>(data: &mut [T]) -> usize
where
    T: PartialEq + Send + 'static,
{
    par_unique_by(data, T::eq)
}

/// Like [`par_unique`] with an explicit equivalence predicate, which must
/// be consistent with the order the slice was sorted under.
pub fn par_unique_by<T, F>(data: &mut [T], eq: F) -> usize
where
    T: Send + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    if data.is_empty() {
        return 0;
    }
    let threads = num_cpus::get().min(data.len());
    let pool = WorkerPool::with_threads(threads);
    par_unique_by_in(&pool, data, eq)
}

/// [`par_unique`] on a caller-supplied pool.
///
/// # Panics
///
/// Panics if the pool's thread count exceeds `data.len()` (an empty slice
/// returns 0 before the check, with no tasks submitted).
pub fn par_unique_in<T>(pool: &WorkerPool, data: &mut [T]) -> usize
where
    T: PartialEq + Send + 'static,
{
    par_unique_by_in(pool, data, T::eq)
}

/// [`par_unique_by`] on a caller-supplied pool.
///
/// One chunk per pool thread, sized `len / threads` with the final chunk
/// absorbing the remainder. Each chunk deduplicates itself as a pool task
/// reporting its new end through a result handle; the boundary-aware merge
/// afterwards is sequential. Must not be called from inside a task of the
/// same pool.
///
/// # Panics
///
/// Panics if the pool's thread count exceeds `data.len()`, or if the
/// equivalence predicate panics inside a chunk task; a chunk failure is
/// re-raised only after every chunk has retired.
pub fn par_unique_by_in<T, F>(pool: &WorkerPool, data: &mut [T], eq: F) -> usize
where
    T: Send + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    if data.is_empty() {
        return 0;
    }
    let threads = pool.thread_count();
    assert!(
        threads <= data.len(),
        "thread count {} exceeds range length {}",
        threads,
        data.len()
    );

    let len = data.len();
    let part = len / threads;
    let ctx = Arc::new(UniqueCtx {
        base: data.as_mut_ptr(),
        eq,
    });

    let handles: Vec<TaskHandle<usize>> = (0..threads)
        .map(|index| {
            let start = index * part;
            let end = if index == threads - 1 { len } else { start + part };
            let ctx = Arc::clone(&ctx);
            pool.submit_with_handle(move || {
                // SAFETY: chunk ranges are pairwise disjoint, `base` stays
                // valid for the whole call, and every handle is joined
                // before the merge below touches the slice again.
                let chunk =
                    unsafe { slice::from_raw_parts_mut(ctx.base.add(start), end - start) };
                start + dedup_adjacent(chunk, &ctx.eq)
            })
        })
        .collect();

    // Every handle is joined before any outcome is inspected; a failure
    // must not propagate while peer chunks can still write into the slice.
    let results: Vec<TaskResult<usize>> = handles.into_iter().map(TaskHandle::join).collect();

    let mut ends = Vec::with_capacity(threads);
    for result in results {
        match result {
            Ok(end) => ends.push(end),
            Err(error) => panic!("unique chunk task failed: {}", error),
        }
    }

    // Stitch boundaries in chunk order: a chunk's first survivor is dropped
    // when it continues the run ending just before `last`; the rest swap
    // down to the compacted prefix.
    let mut last = ends[0];
    for index in 1..threads {
        let mut begin = index * part;
        if (ctx.eq)(&data[begin], &data[last - 1]) {
            begin += 1;
        }
        for offset in begin..ends[index] {
            data.swap(last, offset);
            last += 1;
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_one_element_per_run() {
        let mut data = [1, 1, 2, 3, 3, 3, 4];
        let kept = dedup_adjacent(&mut data, &i32::eq);
        assert_eq!(&data[..kept], [1, 2, 3, 4]);
    }

    #[test]
    fn dedup_handles_trivial_ranges() {
        let mut empty: [i32; 0] = [];
        assert_eq!(dedup_adjacent(&mut empty, &i32::eq), 0);

        let mut single = [7];
        assert_eq!(dedup_adjacent(&mut single, &i32::eq), 1);

        let mut all_equal = [5, 5, 5, 5];
        assert_eq!(dedup_adjacent(&mut all_equal, &i32::eq), 1);
    }

    #[test]
    fn dedup_tail_remains_valid_permutation() {
        let mut data = [1, 1, 2, 2, 3];
        let kept = dedup_adjacent(&mut data, &i32::eq);
        assert_eq!(kept, 3);
        let mut all: Vec<i32> = data.to_vec();
        all.sort_unstable();
        assert_eq!(all, [1, 1, 2, 2, 3]);
    }
}
