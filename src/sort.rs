//! Stable two-way merge and the merge sort built on it
//!
//! Payloads compare byte-wise lexicographically (`str`'s `Ord`). Descending
//! order is the exact mirror, and in both directions an element from the
//! first list wins a tie, so equal payloads keep their relative order.

use crate::element::Element;
use crate::queue::{Queue, OPS};
use intrusive_circular_list::{CircularLink, LinkPtr};
use std::cmp::Ordering;
use std::ptr::NonNull;

#[inline]
fn takes_first(order: Ordering, descend: bool) -> bool {
    if descend {
        order != Ordering::Less
    } else {
        order != Ordering::Greater
    }
}

/// Merges the sorted list `b` into the sorted list `a`, leaving `b` empty.
///
/// # Safety
///
/// `a` and `b` must be distinct initialised heads of element lists.
pub(crate) unsafe fn merge_lists(a: LinkPtr, b: LinkPtr, descend: bool) {
    let merged = CircularLink::new();
    let merged = NonNull::from(&merged);
    OPS.init_head(merged);

    while !OPS.is_empty(a) && !OPS.is_empty(b) {
        let x = OPS.succ(a);
        let y = OPS.succ(b);
        let order = Element::value_of(x).cmp(Element::value_of(y));
        let next = if takes_first(order, descend) { x } else { y };
        OPS.move_before(next, merged);
    }

    // Whatever is left in `a` already follows the merged prefix.
    OPS.splice_after(merged, a);
    OPS.splice_before(b, a);
}

/// Merge sort on the list headed by `head`.
///
/// # Safety
///
/// `head` must be an initialised head of an element list.
pub(crate) unsafe fn sort_list(head: LinkPtr, descend: bool) {
    if OPS.is_empty(head) || OPS.is_singular(head) {
        return;
    }

    let mut left = OPS.succ(head);
    let mut right = OPS.pred(head);
    while left != right && left != OPS.pred(right) {
        left = OPS.succ(left);
        right = OPS.pred(right);
    }

    // `right` opens the second half; everything before it is the first.
    let first = CircularLink::new();
    let first = NonNull::from(&first);
    OPS.init_head(first);
    OPS.cut_position(first, head, OPS.pred(right));

    sort_list(first, descend);
    sort_list(head, descend);

    merge_lists(first, head, descend);
    OPS.splice_after(first, head);
}

impl<A> Queue<A> {
    /// Stably merges the sorted queue `other` into this sorted queue.
    ///
    /// Afterwards `other` is empty. On equal payloads, elements of `self`
    /// come first.
    ///
    /// ```rust
    /// use element_queue::Queue;
    ///
    /// let mut a = Queue::try_from_values(["a", "c", "e"]).unwrap();
    /// let mut b = Queue::try_from_values(["b", "d"]).unwrap();
    /// a.merge_from(&mut b, false);
    /// assert_eq!(a.iter().collect::<Vec<_>>(), ["a", "b", "c", "d", "e"]);
    /// assert!(b.is_empty());
    /// ```
    pub fn merge_from<B>(&mut self, other: &mut Queue<B>, descend: bool) {
        // SAFETY: both heads are initialised and belong to distinct queues.
        unsafe { merge_lists(self.head(), other.head(), descend) }
    }

    /// Sorts the queue with a stable merge sort.
    ///
    /// ```rust
    /// use element_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_values(["pear", "apple", "fig"]).unwrap();
    /// queue.sort(false);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["apple", "fig", "pear"]);
    /// queue.sort(true);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["pear", "fig", "apple"]);
    /// ```
    pub fn sort(&mut self, descend: bool) {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { sort_list(self.head(), descend) }
    }

    /// Returns `true` if the payloads are in order for the given direction.
    pub fn is_sorted(&self, descend: bool) -> bool {
        let mut values = self.iter();
        let Some(mut prev) = values.next() else {
            return true;
        };
        for value in values {
            if !takes_first(prev.cmp(value), descend) {
                return false;
            }
            prev = value;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(values: &[&str]) -> Queue {
        Queue::try_from_values(values).unwrap()
    }

    fn values(queue: &Queue) -> Vec<&str> {
        queue.iter().collect()
    }

    /// Addresses of the payload buffers, which identify elements.
    fn identities(queue: &Queue) -> Vec<*const u8> {
        queue.iter().map(str::as_ptr).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut q = queue(&["delta", "alpha", "charlie", "bravo", "echo"]);
        q.sort(false);
        assert_eq!(values(&q), ["alpha", "bravo", "charlie", "delta", "echo"]);
        assert!(q.is_consistent());
        assert!(q.is_sorted(false));
    }

    #[test]
    fn test_sort_descending() {
        let mut q = queue(&["2", "10", "1", "3"]);
        q.sort(true);
        assert_eq!(values(&q), ["3", "2", "10", "1"]);
        assert!(q.is_sorted(true));
    }

    #[test]
    fn test_sort_is_bytewise() {
        let mut q = queue(&["b", "B", "a", "A"]);
        q.sort(false);
        assert_eq!(values(&q), ["A", "B", "a", "b"]);
    }

    #[test]
    fn test_sort_trivial() {
        let mut empty = queue(&[]);
        empty.sort(false);
        assert!(empty.is_empty());

        let mut one = queue(&["x"]);
        one.sort(true);
        assert_eq!(values(&one), ["x"]);

        let mut two = queue(&["b", "a"]);
        two.sort(false);
        assert_eq!(values(&two), ["a", "b"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut q = queue(&["b", "a", "b", "a", "b"]);
        let before = identities(&q);
        q.sort(false);
        let after = identities(&q);

        // a's were at 1 and 3, b's at 0, 2 and 4.
        assert_eq!(after, [before[1], before[3], before[0], before[2], before[4]]);

        let mut q = queue(&["b", "a", "b", "a", "b"]);
        let before = identities(&q);
        q.sort(true);
        assert_eq!(
            identities(&q),
            [before[0], before[2], before[4], before[1], before[3]]
        );
    }

    #[test]
    fn test_merge_from() {
        let mut a = queue(&["a", "d", "f"]);
        let mut b = queue(&["b", "c", "g", "h"]);
        a.merge_from(&mut b, false);
        assert_eq!(values(&a), ["a", "b", "c", "d", "f", "g", "h"]);
        assert!(b.is_empty());
        assert!(a.is_consistent());
        assert!(b.is_consistent());
    }

    #[test]
    fn test_merge_from_descending() {
        let mut a = queue(&["z", "m"]);
        let mut b = queue(&["y", "n", "a"]);
        a.merge_from(&mut b, true);
        assert_eq!(values(&a), ["z", "y", "n", "m", "a"]);
    }

    #[test]
    fn test_merge_from_prefers_self_on_ties() {
        let mut a = queue(&["k", "k"]);
        let mut b = queue(&["k"]);
        let from_a = identities(&a);
        let from_b = identities(&b);

        a.merge_from(&mut b, false);
        assert_eq!(identities(&a), [from_a[0], from_a[1], from_b[0]]);
    }

    #[test]
    fn test_merge_with_empty() {
        let mut a = queue(&["a"]);
        let mut b = queue(&[]);
        a.merge_from(&mut b, false);
        assert_eq!(values(&a), ["a"]);

        let mut c = queue(&[]);
        c.merge_from(&mut a, false);
        assert_eq!(values(&c), ["a"]);
        assert!(a.is_empty());
    }

    #[test]
    fn test_is_sorted() {
        assert!(queue(&[]).is_sorted(false));
        assert!(queue(&["a", "a", "b"]).is_sorted(false));
        assert!(!queue(&["a", "a", "b"]).is_sorted(true));
        assert!(queue(&["c", "b", "b"]).is_sorted(true));
    }
}
