//! Merging many queues into one
//!
//! Inputs are folded pairwise in a balanced order: first neighbours
//! (0 with 1, 2 with 3, ...), then pairs of pairs, until everything sits in
//! the first queue. Each element takes part in O(log k) merges. The lower
//! index is always the first list of a merge, so ties keep queue order.

use crate::queue::Queue;

/// Merges the elements of every queue into `queues[0]`, sorted.
///
/// Inputs that are not already ordered for `descend` are sorted first, so
/// the result is fully sorted either way. Every other queue is left empty.
/// Returns the total number of elements, or 0 for an empty slice.
///
/// ```rust
/// use element_queue::{merge_all, Queue};
///
/// let mut queues = vec![
///     Queue::try_from_values(["a", "d"]).unwrap(),
///     Queue::try_from_values(["c", "b"]).unwrap(),
///     Queue::try_from_values(["e"]).unwrap(),
/// ];
/// assert_eq!(merge_all(&mut queues, false), 5);
/// assert_eq!(queues[0].iter().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);
/// assert!(queues[1].is_empty() && queues[2].is_empty());
/// ```
pub fn merge_all<A>(queues: &mut [Queue<A>], descend: bool) -> usize {
    if queues.is_empty() {
        return 0;
    }

    for queue in queues.iter_mut() {
        if !queue.is_sorted(descend) {
            queue.sort(descend);
        }
    }

    let count = queues.len();
    let mut step = 1;
    while step < count {
        let mut lower = 0;
        while lower + step < count {
            let (front, back) = queues.split_at_mut(lower + step);
            front[lower].merge_from(&mut back[0], descend);
            lower += 2 * step;
        }
        step *= 2;
    }

    let total = queues[0].size();
    tracing::trace!(queues = count, total, descend, "merged queues");
    total
}
