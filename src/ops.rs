//! Operations on possibly-absent queues
//!
//! These free functions mirror the [`Queue`] API for callers that keep an
//! `Option<Queue>` around, typically because creating the queue may have
//! failed. An absent queue never causes a fault: every function treats it
//! as a no-op and reports `false`, `None` or `0`.
//!
//! ```rust
//! use element_queue::ops;
//!
//! let mut queue = ops::new();
//! assert!(ops::insert_tail(queue.as_mut(), "a"));
//! assert!(ops::insert_tail(queue.as_mut(), "b"));
//! assert_eq!(ops::size(queue.as_ref()), 2);
//!
//! let mut missing = None;
//! assert!(!ops::insert_tail(missing.as_mut(), "a"));
//! assert_eq!(ops::size(missing.as_ref()), 0);
//! # let _: Option<element_queue::Queue> = missing;
//! ops::free(queue);
//! ```

use crate::element::Element;
use crate::error::QueueError;
use crate::gate::{AllocGate, Global};
use crate::merge::merge_all;
use crate::queue::Queue;

/// Creates an empty queue, or `None` if the sentinel allocation fails.
pub fn new() -> Option<Queue<Global>> {
    Queue::new().ok()
}

/// Creates an empty queue using `alloc`, or `None` on allocation failure.
pub fn new_in<A: AllocGate>(alloc: A) -> Option<Queue<A>> {
    Queue::new_in(alloc).ok()
}

/// Frees a queue and every element in it.
pub fn free<A>(queue: Option<Queue<A>>) {
    drop(queue);
}

/// Inserts at the front, reporting why it failed.
pub fn try_insert_head<A: AllocGate>(
    queue: Option<&mut Queue<A>>,
    value: &str,
) -> Result<(), QueueError> {
    queue.ok_or(QueueError::Absent)?.insert_head(value)
}

/// Inserts at the back, reporting why it failed.
pub fn try_insert_tail<A: AllocGate>(
    queue: Option<&mut Queue<A>>,
    value: &str,
) -> Result<(), QueueError> {
    queue.ok_or(QueueError::Absent)?.insert_tail(value)
}

/// Inserts at the front; `false` if the queue is absent or allocation fails.
pub fn insert_head<A: AllocGate>(queue: Option<&mut Queue<A>>, value: &str) -> bool {
    try_insert_head(queue, value).is_ok()
}

/// Inserts at the back; `false` if the queue is absent or allocation fails.
pub fn insert_tail<A: AllocGate>(queue: Option<&mut Queue<A>>, value: &str) -> bool {
    try_insert_tail(queue, value).is_ok()
}

/// See [`Queue::remove_head`].
pub fn remove_head<A>(queue: Option<&mut Queue<A>>, out: Option<&mut [u8]>) -> Option<Box<Element>> {
    queue?.remove_head(out)
}

/// See [`Queue::remove_tail`].
pub fn remove_tail<A>(queue: Option<&mut Queue<A>>, out: Option<&mut [u8]>) -> Option<Box<Element>> {
    queue?.remove_tail(out)
}

/// Frees a removed element, if any.
pub fn release_element(element: Option<Box<Element>>) {
    if let Some(element) = element {
        element.release();
    }
}

/// Number of elements; 0 for an absent queue.
pub fn size<A>(queue: Option<&Queue<A>>) -> usize {
    queue.map_or(0, Queue::size)
}

/// See [`Queue::delete_mid`]; `false` for an absent queue.
pub fn delete_mid<A>(queue: Option<&mut Queue<A>>) -> bool {
    queue.is_some_and(Queue::delete_mid)
}

/// See [`Queue::delete_dup`]; `false` for an absent queue.
pub fn delete_dup<A>(queue: Option<&mut Queue<A>>) -> bool {
    queue.is_some_and(Queue::delete_dup)
}

/// See [`Queue::swap`].
pub fn swap<A>(queue: Option<&mut Queue<A>>) {
    if let Some(queue) = queue {
        queue.swap();
    }
}

/// See [`Queue::reverse`].
pub fn reverse<A>(queue: Option<&mut Queue<A>>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// See [`Queue::reverse_k`]. A non-positive `k` is a no-op.
pub fn reverse_k<A>(queue: Option<&mut Queue<A>>, k: i32) {
    let (Some(queue), Ok(k)) = (queue, usize::try_from(k)) else {
        return;
    };
    queue.reverse_k(k);
}

/// See [`Queue::sort`].
pub fn sort<A>(queue: Option<&mut Queue<A>>, descend: bool) {
    if let Some(queue) = queue {
        queue.sort(descend);
    }
}

/// See [`Queue::merge_from`]. Does nothing unless both queues are present.
pub fn merge_two<A, B>(first: Option<&mut Queue<A>>, second: Option<&mut Queue<B>>, descend: bool) {
    if let (Some(first), Some(second)) = (first, second) {
        first.merge_from(second, descend);
    }
}

/// See [`Queue::ascend`]; 0 for an absent queue.
pub fn ascend<A>(queue: Option<&mut Queue<A>>) -> usize {
    queue.map_or(0, Queue::ascend)
}

/// See [`Queue::descend`]; 0 for an absent queue.
pub fn descend<A>(queue: Option<&mut Queue<A>>) -> usize {
    queue.map_or(0, Queue::descend)
}

/// See [`merge_all`]; 0 when `queues` is absent.
pub fn merge<A>(queues: Option<&mut [Queue<A>]>, descend: bool) -> usize {
    queues.map_or(0, |queues| merge_all(queues, descend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{FaultConfig, FaultInjector};

    #[test]
    fn test_absent_queue_is_harmless() {
        let mut missing: Option<Queue> = None;

        assert!(!insert_head(missing.as_mut(), "a"));
        assert_eq!(
            try_insert_tail(missing.as_mut(), "a"),
            Err(QueueError::Absent)
        );
        assert!(remove_head(missing.as_mut(), None).is_none());
        assert!(remove_tail(missing.as_mut(), Some(&mut [0u8; 4][..])).is_none());
        assert_eq!(size(missing.as_ref()), 0);
        assert!(!delete_mid(missing.as_mut()));
        assert!(!delete_dup(missing.as_mut()));
        swap(missing.as_mut());
        reverse(missing.as_mut());
        reverse_k(missing.as_mut(), 3);
        sort(missing.as_mut(), false);
        assert_eq!(ascend(missing.as_mut()), 0);
        assert_eq!(descend(missing.as_mut()), 0);
        assert_eq!(merge::<Global>(None, false), 0);
        release_element(None);
        free(missing);
    }

    #[test]
    fn test_present_queue_round_trip() {
        let mut queue = new();
        assert!(insert_tail(queue.as_mut(), "b"));
        assert!(insert_head(queue.as_mut(), "a"));
        assert!(insert_tail(queue.as_mut(), "c"));
        assert_eq!(size(queue.as_ref()), 3);

        let mut buf = [0u8; 8];
        let element = remove_head(queue.as_mut(), Some(&mut buf[..]));
        assert_eq!(&buf[..2], b"a\0");
        release_element(element);

        assert!(delete_mid(queue.as_mut()));
        assert_eq!(size(queue.as_ref()), 1);
        free(queue);
    }

    #[test]
    fn test_reverse_k_rejects_non_positive() {
        let mut queue = Queue::try_from_values(["1", "2", "3"]).ok();
        reverse_k(queue.as_mut(), -2);
        reverse_k(queue.as_mut(), 0);
        let values: Vec<String> = queue
            .as_ref()
            .map(|q| q.iter().map(str::to_owned).collect())
            .unwrap_or_default();
        assert_eq!(values, ["1", "2", "3"]);

        reverse_k(queue.as_mut(), 2);
        let values: Vec<String> = queue
            .as_ref()
            .map(|q| q.iter().map(str::to_owned).collect())
            .unwrap_or_default();
        assert_eq!(values, ["2", "1", "3"]);
    }

    #[test]
    fn test_merge_two_needs_both() {
        let mut a = Queue::try_from_values(["a"]).ok();
        let mut b = Queue::try_from_values(["b"]).ok();

        merge_two::<Global, Global>(a.as_mut(), None, false);
        assert_eq!(size(a.as_ref()), 1);

        merge_two(a.as_mut(), b.as_mut(), false);
        assert_eq!(size(a.as_ref()), 2);
        assert_eq!(size(b.as_ref()), 0);
    }

    #[test]
    fn test_filters_on_singular_queue() {
        let mut queue = Queue::try_from_values(["only"]).ok();
        assert_eq!(ascend(queue.as_mut()), 0);
        assert_eq!(descend(queue.as_mut()), 0);
        assert_eq!(size(queue.as_ref()), 1);
    }

    #[test]
    fn test_new_in_refused() {
        let injector = FaultInjector::new(FaultConfig::new().fail_after(0));
        assert!(new_in(&injector).is_none());
        assert_eq!(injector.refused(), 1);
    }

    #[test]
    fn test_merge_slice() {
        let mut queues = vec![
            Queue::try_from_values(["c"]).unwrap(),
            Queue::try_from_values(["a", "b"]).unwrap(),
        ];
        assert_eq!(merge(Some(&mut queues[..]), false), 3);
        assert_eq!(queues[0].iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    }
}
