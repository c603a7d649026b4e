//! Sentinel-headed intrusive circular doubly-linked list.
//!
//! The list is a ring of [`CircularLink`]s embedded in caller-owned
//! structures. One link in every ring is the *head* (sentinel): it carries no
//! payload and marks the boundary of the list. The elements are every other
//! node of the ring, in `next` order starting after the head.
//!
//! # Rings and heads
//!
//! - An empty list is a head whose `next` and `prev` both point at itself.
//! - A singular list has exactly one node besides the head.
//! - A detached node has `None` in both links and belongs to no ring.
//!
//! Every operation in [`CircularListOps`] takes the ring from one consistent
//! state to another: for each reachable node `n`, `n.next.prev == n` and
//! `n.prev.next == n`. [`CircularListOps::verify`] checks exactly that.
//!
//! Heads do not have to live on the heap. A temporary head on the stack is a
//! convenient place to hold a cut-out run of nodes, as long as it is empty
//! again before it goes out of scope.
//!
//! # Example
//!
//! ```rust
//! use intrusive_circular_list::{container_of, CircularLink, CircularListOps};
//! use std::ptr::NonNull;
//!
//! struct Node {
//!     link: CircularLink,
//!     value: i32,
//! }
//!
//! let ops = CircularListOps::new();
//! let head = CircularLink::new();
//! let a = Node { link: CircularLink::new(), value: 1 };
//! let b = Node { link: CircularLink::new(), value: 2 };
//!
//! unsafe {
//!     let head = NonNull::from(&head);
//!     ops.init_head(head);
//!     ops.insert_before(head, NonNull::from(&a.link));
//!     ops.insert_before(head, NonNull::from(&b.link));
//!
//!     assert_eq!(ops.len(head), 2);
//!     let first = ops.next(head).unwrap();
//!     let node: *const Node = container_of!(first.as_ptr(), Node, link);
//!     assert_eq!((*node).value, 1);
//!
//!     // Unlink everything before the nodes go out of scope.
//!     ops.remove(NonNull::from(&a.link));
//!     ops.remove(NonNull::from(&b.link));
//!     assert!(ops.is_empty(head));
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

use core::cell::Cell;
use core::fmt;
use core::ptr::NonNull;

/// Raw pointer to a link, the currency of every list operation.
pub type LinkPtr = NonNull<CircularLink>;

// =============================================================================
// CircularLink
// =============================================================================

/// Intrusive link that lets an object join a circular list.
///
/// A detached link has `None` in both directions. Once linked (including a
/// head that is its own ring), both directions point at valid nodes.
#[repr(C)]
pub struct CircularLink {
    next: Cell<Option<LinkPtr>>,
    prev: Cell<Option<LinkPtr>>,
}

impl CircularLink {
    /// Creates a new detached `CircularLink`.
    #[inline]
    pub const fn new() -> CircularLink {
        CircularLink {
            next: Cell::new(None),
            prev: Cell::new(None),
        }
    }

    /// Checks whether this link is part of a ring.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.get().is_some()
    }

    /// Clears both pointers without touching the neighbours.
    ///
    /// # Safety
    ///
    /// The neighbours must no longer refer to this link, or must be
    /// discarded along with it.
    #[inline]
    pub unsafe fn force_unlink(&self) {
        self.next.set(None);
        self.prev.set(None);
    }

    /// Gets the next link pointer.
    #[inline]
    pub fn next(&self) -> Option<LinkPtr> {
        self.next.get()
    }

    /// Gets the previous link pointer.
    #[inline]
    pub fn prev(&self) -> Option<LinkPtr> {
        self.prev.get()
    }

    #[inline]
    fn set_next(&self, next: LinkPtr) {
        self.next.set(Some(next));
    }

    #[inline]
    fn set_prev(&self, prev: LinkPtr) {
        self.prev.set(Some(prev));
    }
}

impl Default for CircularLink {
    #[inline]
    fn default() -> Self {
        CircularLink::new()
    }
}

impl fmt::Debug for CircularLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_linked() {
            write!(f, "CircularLink(linked)")
        } else {
            write!(f, "CircularLink(detached)")
        }
    }
}

// =============================================================================
// Raw helpers
// =============================================================================

#[inline]
unsafe fn succ(ptr: LinkPtr) -> LinkPtr {
    debug_assert!(ptr.as_ref().is_linked(), "node is not linked");
    ptr.as_ref().next().unwrap_unchecked()
}

#[inline]
unsafe fn pred(ptr: LinkPtr) -> LinkPtr {
    debug_assert!(ptr.as_ref().is_linked(), "node is not linked");
    ptr.as_ref().prev().unwrap_unchecked()
}

/// Points `a.next` at `b` and `b.prev` at `a`.
#[inline]
unsafe fn join(a: LinkPtr, b: LinkPtr) {
    a.as_ref().set_next(b);
    b.as_ref().set_prev(a);
}

// =============================================================================
// CircularListOps
// =============================================================================

/// Operations on sentinel-headed circular lists.
///
/// # Safety
///
/// The methods work on raw pointers. Callers must ensure that:
/// - every pointer is valid and stays put while it is linked;
/// - `head` arguments are initialised heads (see [`init_head`](Self::init_head));
/// - nodes passed for insertion are detached, and nodes passed for removal
///   are linked;
/// - source and destination rings of a splice or cut are distinct.
#[derive(Clone, Copy, Default, Debug)]
pub struct CircularListOps;

impl CircularListOps {
    /// Creates a new `CircularListOps`.
    #[inline]
    pub const fn new() -> Self {
        CircularListOps
    }

    /// Turns `head` into an empty list, discarding whatever it pointed at.
    ///
    /// # Safety
    ///
    /// The pointer must be valid. Any nodes still reachable from the old
    /// ring are orphaned, not unlinked.
    #[inline]
    pub unsafe fn init_head(&self, head: LinkPtr) {
        join(head, head);
    }

    /// Returns `true` if the list headed by `head` has no elements.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised head.
    #[inline]
    pub unsafe fn is_empty(&self, head: LinkPtr) -> bool {
        succ(head) == head
    }

    /// Returns `true` if the list headed by `head` has exactly one element.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised head.
    #[inline]
    pub unsafe fn is_singular(&self, head: LinkPtr) -> bool {
        let first = succ(head);
        first != head && first == pred(head)
    }

    /// Gets the next link in the ring.
    ///
    /// # Safety
    ///
    /// The pointer must be valid and properly aligned.
    #[inline]
    pub unsafe fn next(&self, ptr: LinkPtr) -> Option<LinkPtr> {
        ptr.as_ref().next()
    }

    /// Gets the previous link in the ring.
    ///
    /// # Safety
    ///
    /// The pointer must be valid and properly aligned.
    #[inline]
    pub unsafe fn prev(&self, ptr: LinkPtr) -> Option<LinkPtr> {
        ptr.as_ref().prev()
    }

    /// Successor of a node that is known to be linked.
    ///
    /// # Safety
    ///
    /// The node must be linked; a detached node is undefined behaviour.
    #[inline]
    pub unsafe fn succ(&self, ptr: LinkPtr) -> LinkPtr {
        succ(ptr)
    }

    /// Predecessor of a node that is known to be linked.
    ///
    /// # Safety
    ///
    /// The node must be linked; a detached node is undefined behaviour.
    #[inline]
    pub unsafe fn pred(&self, ptr: LinkPtr) -> LinkPtr {
        pred(ptr)
    }

    /// Inserts `new` right after `at`.
    ///
    /// With `at` a head, this is insertion at the front.
    ///
    /// # Safety
    ///
    /// - `at` must be linked
    /// - `new` must be detached
    #[inline]
    pub unsafe fn insert_after(&self, at: LinkPtr, new: LinkPtr) {
        debug_assert!(!new.as_ref().is_linked(), "new is already linked");

        let next = succ(at);
        join(at, new);
        join(new, next);
    }

    /// Inserts `new` right before `at`.
    ///
    /// With `at` a head, this is insertion at the back.
    ///
    /// # Safety
    ///
    /// - `at` must be linked
    /// - `new` must be detached
    #[inline]
    pub unsafe fn insert_before(&self, at: LinkPtr, new: LinkPtr) {
        debug_assert!(!new.as_ref().is_linked(), "new is already linked");

        let prev = pred(at);
        join(prev, new);
        join(new, at);
    }

    /// Unlinks `ptr` from its ring and leaves it detached.
    ///
    /// Returns `true` if `ptr` was the only node of its ring.
    ///
    /// # Safety
    ///
    /// The node must be linked.
    #[inline]
    pub unsafe fn remove(&self, ptr: LinkPtr) -> bool {
        let next = succ(ptr);
        let prev = pred(ptr);

        let alone = next == ptr;
        if !alone {
            join(prev, next);
        }
        ptr.as_ref().force_unlink();
        alone
    }

    /// Moves a linked node to just after `at`, possibly in another ring.
    ///
    /// # Safety
    ///
    /// Both nodes must be linked and `node != at`.
    #[inline]
    pub unsafe fn move_after(&self, node: LinkPtr, at: LinkPtr) {
        debug_assert!(node != at, "cannot move a node next to itself");
        self.remove(node);
        self.insert_after(at, node);
    }

    /// Moves a linked node to just before `at`, possibly in another ring.
    ///
    /// # Safety
    ///
    /// Both nodes must be linked and `node != at`.
    #[inline]
    pub unsafe fn move_before(&self, node: LinkPtr, at: LinkPtr) {
        debug_assert!(node != at, "cannot move a node next to itself");
        self.remove(node);
        self.insert_before(at, node);
    }

    /// Cuts the run `head.next ..= entry` out of `head` and into `dst`.
    ///
    /// Nothing happens when `head` is empty, or when `head` is singular and
    /// `entry` is neither `head` nor its only element. With `entry == head`
    /// the run is empty and `dst` is reset to an empty list.
    ///
    /// `head` need not be a real sentinel: any linked node works as the
    /// anchor, and the run then starts right after it.
    ///
    /// # Safety
    ///
    /// - `dst` must be an empty head outside `head`'s ring
    /// - `entry` must be `head` or a node reachable from it
    pub unsafe fn cut_position(&self, dst: LinkPtr, head: LinkPtr, entry: LinkPtr) {
        if self.is_empty(head) {
            return;
        }
        if self.is_singular(head) && succ(head) != entry && head != entry {
            return;
        }
        if entry == head {
            self.init_head(dst);
            return;
        }
        debug_assert!(self.is_empty(dst), "cut destination is not empty");

        let first = succ(head);
        let rest = succ(entry);
        join(dst, first);
        join(entry, dst);
        join(head, rest);
    }

    /// Moves every node of `src` to just after `at`, leaving `src` empty.
    ///
    /// # Safety
    ///
    /// `src` must be an initialised head and `at` a linked node of a
    /// different ring.
    pub unsafe fn splice_after(&self, src: LinkPtr, at: LinkPtr) {
        if self.is_empty(src) {
            return;
        }
        let first = succ(src);
        let last = pred(src);
        let next = succ(at);

        join(at, first);
        join(last, next);
        self.init_head(src);
    }

    /// Moves every node of `src` to just before `at`, leaving `src` empty.
    ///
    /// # Safety
    ///
    /// `src` must be an initialised head and `at` a linked node of a
    /// different ring.
    pub unsafe fn splice_before(&self, src: LinkPtr, at: LinkPtr) {
        if self.is_empty(src) {
            return;
        }
        let first = succ(src);
        let last = pred(src);
        let prev = pred(at);

        join(prev, first);
        join(last, at);
        self.init_head(src);
    }

    /// Counts the elements of the list headed by `head`.
    ///
    /// This is O(n); no count is cached anywhere.
    ///
    /// # Safety
    ///
    /// `head` must be an initialised head.
    pub unsafe fn len(&self, head: LinkPtr) -> usize {
        let mut count = 0;
        let mut current = succ(head);

        while current != head {
            count += 1;
            current = succ(current);
        }

        count
    }

    /// Calls `f` on every element after `head`, in order.
    ///
    /// The successor is read before `f` runs, so `f` may unlink or free the
    /// node it is given (but no other node).
    ///
    /// # Safety
    ///
    /// `head` must be an initialised head.
    pub unsafe fn for_each_safe<F>(&self, head: LinkPtr, mut f: F)
    where
        F: FnMut(LinkPtr),
    {
        let mut current = succ(head);

        while current != head {
            let next = succ(current);
            f(current);
            current = next;
        }
    }

    /// Walks the ring starting at `head` and checks that every node's
    /// neighbours point back at it.
    ///
    /// Returns `false` on the first detached or inconsistent node.
    ///
    /// # Safety
    ///
    /// Every node reachable from `head` must be a valid pointer.
    pub unsafe fn verify(&self, head: LinkPtr) -> bool {
        let mut current = head;
        loop {
            let (Some(next), Some(prev)) = (current.as_ref().next(), current.as_ref().prev())
            else {
                return false;
            };
            if next.as_ref().prev() != Some(current) || prev.as_ref().next() != Some(current) {
                return false;
            }
            current = next;
            if current == head {
                return true;
            }
        }
    }
}

// =============================================================================
// Container recovery
// =============================================================================

/// Recovers a pointer to the struct that embeds a link.
///
/// # Example
///
/// ```rust
/// use intrusive_circular_list::{container_of, CircularLink};
/// use std::ptr::NonNull;
///
/// struct Node {
///     value: i32,
///     link: CircularLink,
/// }
///
/// let node = Node { value: 42, link: CircularLink::new() };
/// let link_ptr = NonNull::from(&node.link);
///
/// unsafe {
///     let node_ptr: *const Node = container_of!(link_ptr.as_ptr(), Node, link);
///     assert_eq!((*node_ptr).value, 42);
/// }
/// ```
#[macro_export]
macro_rules! container_of {
    ($ptr:expr, $type:ty, $field:ident) => {{
        let ptr = $ptr as *const u8;
        let offset = core::mem::offset_of!($type, $field);
        ptr.sub(offset) as *const $type
    }};
}

/// Mutable version of `container_of`.
#[macro_export]
macro_rules! container_of_mut {
    ($ptr:expr, $type:ty, $field:ident) => {{
        let ptr = $ptr as *mut u8;
        let offset = core::mem::offset_of!($type, $field);
        ptr.sub(offset) as *mut $type
    }};
}

// =============================================================================
// Tests
// =============================================================================
