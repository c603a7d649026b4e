//! Monotonic filter: keep only elements that are extremal with respect to
//! everything on their right
//!
//! The scan runs from the tail toward the head. The retained elements are
//! the stack: the most recently kept one is the current best, and each
//! predecessor is compared against it alone. Rejected elements are moved
//! onto a pending list through their own links and released at the end.

use crate::element::{self, Element};
use crate::queue::{Queue, OPS};
use intrusive_circular_list::{CircularLink, LinkPtr};
use std::cmp::Ordering;
use std::ptr::NonNull;

/// Drops every element whose comparison with the best element to its right
/// fails `keep`, returning how many elements remain.
///
/// Empty and singular lists are left alone and report 0.
///
/// # Safety
///
/// `head` must be an initialised head of an element list.
unsafe fn retain_extremal(head: LinkPtr, keep: fn(Ordering) -> bool) -> usize {
    if OPS.is_empty(head) || OPS.is_singular(head) {
        return 0;
    }

    let pending = CircularLink::new();
    let pending = NonNull::from(&pending);
    OPS.init_head(pending);

    let mut best = OPS.pred(head);
    let mut kept = 1;
    loop {
        let candidate = OPS.pred(best);
        if candidate == head {
            break;
        }
        if keep(Element::value_of(candidate).cmp(Element::value_of(best))) {
            kept += 1;
            best = candidate;
        } else {
            OPS.move_after(candidate, pending);
        }
    }

    element::release_all(pending);
    kept
}

impl<A> Queue<A> {
    /// Removes every element that has a strictly smaller payload anywhere to
    /// its right, returning the number of elements left.
    ///
    /// A queue of zero or one elements is untouched and reports 0.
    ///
    /// ```rust
    /// use element_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_values(["1", "5", "2", "4", "3"]).unwrap();
    /// assert_eq!(queue.ascend(), 3);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["1", "2", "3"]);
    /// ```
    pub fn ascend(&mut self) -> usize {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { retain_extremal(self.head(), |order| order != Ordering::Greater) }
    }

    /// Removes every element that has a strictly greater payload anywhere to
    /// its right, returning the number of elements left.
    ///
    /// A queue of zero or one elements is untouched and reports 0.
    ///
    /// ```rust
    /// use element_queue::Queue;
    ///
    /// let mut queue = Queue::try_from_values(["5", "2", "9", "3", "8"]).unwrap();
    /// assert_eq!(queue.descend(), 2);
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["9", "8"]);
    /// ```
    pub fn descend(&mut self) -> usize {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { retain_extremal(self.head(), |order| order != Ordering::Less) }
    }
}
