//! Linear transforms: reversal, k-group reversal, duplicate collapsing and
//! middle deletion
//!
//! All of them rewire links in place. Temporary list heads live on the
//! stack and are empty again before they go out of scope.

use crate::element::{self, Element};
use crate::queue::{Queue, OPS};
use intrusive_circular_list::{CircularLink, LinkPtr};
use std::ptr::NonNull;

/// Reverses the list headed by `head` by moving each element to the front.
///
/// # Safety
///
/// `head` must be an initialised head.
pub(crate) unsafe fn reverse_list(head: LinkPtr) {
    if OPS.is_empty(head) {
        return;
    }
    OPS.for_each_safe(head, |node| OPS.move_after(node, head));
}

/// Reverses every full run of `k` elements, leaving a short tail alone.
///
/// # Safety
///
/// `head` must be an initialised head.
pub(crate) unsafe fn reverse_groups(head: LinkPtr, k: usize) {
    if k <= 1 || OPS.is_empty(head) {
        return;
    }

    let mut remaining = k;
    let mut anchor = head;
    let mut cursor = OPS.succ(head);
    while cursor != head {
        let next = OPS.succ(cursor);
        remaining -= 1;
        if remaining == 0 {
            remaining = k;

            let group = CircularLink::new();
            let group = NonNull::from(&group);
            OPS.init_head(group);

            OPS.cut_position(group, anchor, cursor);
            reverse_list(group);
            OPS.splice_after(group, anchor);

            // The last node of the reversed run anchors the next one.
            anchor = OPS.pred(next);
        }
        cursor = next;
    }
}

impl<A> Queue<A> {
    /// Reverses the queue in place.
    ///
    /// ```rust
    /// use element_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_values(["a", "b", "c"]).unwrap();
    /// queue.reverse();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["c", "b", "a"]);
    /// ```
    pub fn reverse(&mut self) {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { reverse_list(self.head()) }
    }

    /// Reverses the elements `k` at a time.
    ///
    /// A trailing run shorter than `k` keeps its order. `k <= 1` is a no-op.
    ///
    /// ```rust
    /// use element_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_values(["1", "2", "3", "4", "5"]).unwrap();
    /// queue.reverse_k(2);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["2", "1", "4", "3", "5"]);
    /// ```
    pub fn reverse_k(&mut self, k: usize) {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { reverse_groups(self.head(), k) }
    }

    /// Swaps every two adjacent elements.
    pub fn swap(&mut self) {
        self.reverse_k(2);
    }

    /// Removes every run of two or more adjacent equal payloads, including
    /// the first element of the run.
    ///
    /// Equal payloads are expected to be contiguous already, for example
    /// after [`sort`](Self::sort). Always returns `true`.
    pub fn delete_dup(&mut self) -> bool {
        // SAFETY: the head is initialised and owned by `self`; temporary
        // heads are emptied before they are dropped.
        unsafe {
            let head = self.head();

            let pending = CircularLink::new();
            let pending = NonNull::from(&pending);
            OPS.init_head(pending);

            let mut run_start = OPS.succ(head);
            let mut cursor = run_start;
            while cursor != head {
                let next = OPS.succ(cursor);
                if next != head && Element::value_of(cursor) == Element::value_of(next) {
                    cursor = next;
                    continue;
                }

                if cursor != run_start {
                    let run = CircularLink::new();
                    let run = NonNull::from(&run);
                    OPS.init_head(run);

                    OPS.cut_position(run, OPS.pred(run_start), cursor);
                    OPS.splice_before(run, pending);
                }
                run_start = next;
                cursor = next;
            }

            element::release_all(pending);
        }
        true
    }

    /// Deletes the element at index `size / 2`.
    ///
    /// Two cursors walk in from both ends until they meet; for an even
    /// length this picks the later of the two middle elements. Returns
    /// `false` if the queue is empty.
    pub fn delete_mid(&mut self) -> bool {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe {
            let head = self.head();
            if OPS.is_empty(head) {
                return false;
            }

            let mut left = OPS.succ(head);
            let mut right = OPS.pred(head);
            while left != right && left != OPS.pred(right) {
                left = OPS.succ(left);
                right = OPS.pred(right);
            }

            OPS.remove(right);
            drop(Element::from_link(right));
        }
        true
    }
}
