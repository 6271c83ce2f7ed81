use super::pool::{PoolShared, WorkerPool};
use std::{cmp::Ordering, slice, sync::Arc};

/// Sub-ranges stop being split once they shrink below
/// `len / (threads * FANOUT_PER_THREAD)` elements; the sequential sort
/// takes over from there.
const FANOUT_PER_THREAD: usize = 8;

struct SortCtx<T, F> {
    base: *mut T,
    threshold: usize,
    is_less: F,
}

// Tasks share the context read-only; the element ranges they touch through
// `base` are pairwise disjoint.
unsafe impl<T: Send, F: Send + Sync> Send for SortCtx<T, F> {}
unsafe impl<T: Send, F: Send + Sync> Sync for SortCtx<T, F> {}

fn sequential_sort<T, F>(range: &mut [T], is_less: &F)
where
    F: Fn(&T, &T) -> bool,
{
    range.sort_unstable_by(|a, b| {
        if is_less(a, b) {
            Ordering::Less
        } else if is_less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}

/// Swaps every element satisfying `keep_left` in front of the rest,
/// returning the boundary index. Single linear pass.
fn partition_in_place<T, P>(range: &mut [T], mut keep_left: P) -> usize
where
    P: FnMut(&T) -> bool,
{
    let mut boundary = 0;
    for index in 0..range.len() {
        if keep_left(&range[index]) {
            range.swap(boundary, index);
            boundary += 1;
        }
    }
    boundary
}

fn sort_range<T, F>(ctx: &Arc<SortCtx<T, F>>, pool: &Arc<PoolShared>, lo: usize, hi: usize)
where
    T: Send + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    let len = hi - lo;
    if len <= 1 {
        return;
    }
    // SAFETY: `base` is valid for the whole sort call, which waits for
    // pool quiescence before returning; live tasks hold pairwise disjoint
    // `[lo, hi)` ranges, and the queue transfer orders a parent's writes
    // before its children's accesses.
    let range = unsafe { slice::from_raw_parts_mut(ctx.base.add(lo), len) };
    if len <= ctx.threshold {
        sequential_sort(range, &ctx.is_less);
        return;
    }

    // Park the middle element at the end so both partition passes can
    // compare against it while the rest of the range is reordered.
    range.swap(len / 2, len - 1);
    let (body, pivot_slot) = range.split_at_mut(len - 1);
    let pivot = &pivot_slot[0];
    let below = partition_in_place(body, |elem| (ctx.is_less)(elem, pivot));
    let equal = partition_in_place(&mut body[below..], |elem| !(ctx.is_less)(pivot, elem));
    range.swap(below + equal, len - 1);

    // [below, below + equal + 1) is the pivot run, already in final
    // position; only the outer sections are resubmitted.
    let above = below + equal + 1;
    let (left_ctx, left_pool) = (Arc::clone(ctx), Arc::clone(pool));
    pool.submit(Box::new(move || {
        sort_range(&left_ctx, &left_pool, lo, lo + below);
    }));
    let (right_ctx, right_pool) = (Arc::clone(ctx), Arc::clone(pool));
    pool.submit(Box::new(move || {
        sort_range(&right_ctx, &right_pool, lo + above, hi);
    }));
}

/// Sorts `data` in place on a pool sized to the host, in non-decreasing
/// order. Not stable.
///
/// ```
/// let mut data = vec![3, 1, 4, 1, 5, 9, 2, 6];
/// parwork::par_sort(&mut data);
/// assert_eq!(data, [1, 1, 2, 3, 4, 5, 6, 9]);
/// ```
pub fn par_sort<T>(data: &mut [T])
where
    T: Ord + Send + 'static,
{
    par_sort_by(data, T::lt);
}

/// Like [`par_sort`], ordering elements by the `is_less` predicate, which
/// must be a strict weak order.
pub fn par_sort_by<T, F>(data: &mut [T], is_less: F)
where
    T: Send + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    let pool = WorkerPool::new();
    par_sort_by_in(&pool, data, is_less);
}

/// Sorts `data` on a caller-supplied pool.
pub fn par_sort_in<T>(pool: &WorkerPool, data: &mut [T])
where
    T: Ord + Send + 'static,
{
    par_sort_by_in(pool, data, T::lt);
}

/// Sorts `data` on a caller-supplied pool with the `is_less` predicate.
///
/// Submits one root task over the full range and blocks on the pool's
/// quiescence barrier until the whole recursive task tree has retired.
/// The split threshold derives from the pool's thread count. Must not be
/// called from inside a task of the same pool.
pub fn par_sort_by_in<T, F>(pool: &WorkerPool, data: &mut [T], is_less: F)
where
    T: Send + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    if data.len() <= 1 {
        return;
    }
    let len = data.len();
    let threshold = len / (pool.thread_count() * FANOUT_PER_THREAD);
    let ctx = Arc::new(SortCtx {
        base: data.as_mut_ptr(),
        threshold,
        is_less,
    });

    let shared = Arc::clone(pool.shared());
    pool.shared().submit(Box::new(move || {
        sort_range(&ctx, &shared, 0, len);
    }));
    pool.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_moves_matching_elements_left() {
        let mut data = [5, 1, 8, 2, 9, 3];
        let boundary = partition_in_place(&mut data, |&x| x < 5);
        assert_eq!(boundary, 3);
        let (left, right) = data.split_at(boundary);
        assert!(left.iter().all(|&x| x < 5));
        assert!(right.iter().all(|&x| x >= 5));
    }

    #[test]
    fn partition_handles_empty_and_uniform_input() {
        let mut empty: [i32; 0] = [];
        assert_eq!(partition_in_place(&mut empty, |&x| x < 0), 0);

        let mut all = [1, 1, 1];
        assert_eq!(partition_in_place(&mut all, |&x| x < 2), 3);
        assert_eq!(partition_in_place(&mut all, |&x| x < 0), 0);
    }

    #[test]
    fn sequential_fallback_orders_by_predicate() {
        let mut data = vec![4u32, 2, 7, 7, 0];
        sequential_sort(&mut data, &u32::lt);
        assert_eq!(data, [0, 2, 4, 7, 7]);
    }
}
