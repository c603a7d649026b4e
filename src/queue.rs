//! The owning queue handle and its O(1) structural operations
//!
//! A [`Queue`] owns a heap-allocated sentinel and, through it, every element
//! threaded into the ring. Operations rewire links in place; elements never
//! move in memory and payloads are never copied after insertion.
//!
//! Higher-level transforms are further `impl` blocks in sibling modules:
//! reversal, deduplication and middle deletion in `transform`, merging and
//! sorting in `sort`, and the ascend/descend filter in `filter`.

use crate::element::{self, Element};
use crate::error::QueueError;
use crate::gate::{self, AllocGate, AllocKind, Global};
use intrusive_circular_list::{CircularLink, CircularListOps, LinkPtr};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

pub(crate) const OPS: CircularListOps = CircularListOps::new();

/// In-place string queue on an intrusive circular list
///
/// # Example
///
/// ```rust
/// use element_queue::Queue;
///
/// let mut queue = Queue::new().unwrap();
/// queue.insert_tail("a").unwrap();
/// queue.insert_tail("b").unwrap();
/// queue.insert_head("z").unwrap();
///
/// assert_eq!(queue.iter().collect::<Vec<_>>(), ["z", "a", "b"]);
///
/// let first = queue.remove_head(None).unwrap();
/// assert_eq!(first.value(), "z");
/// assert_eq!(queue.size(), 2);
/// ```
pub struct Queue<A = Global> {
    head: LinkPtr,
    alloc: A,
    // The queue owns every element reachable from `head`
    _owns: PhantomData<Box<Element>>,
}

impl Queue<Global> {
    /// Creates an empty queue with the default gate.
    ///
    /// Fails only if the sentinel cannot be allocated.
    pub fn new() -> Result<Self, QueueError> {
        Self::new_in(Global)
    }

    /// Builds a queue holding copies of `values`, in order.
    pub fn try_from_values<I, S>(values: I) -> Result<Self, QueueError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queue = Self::new()?;
        queue.extend_tail(values)?;
        Ok(queue)
    }
}

impl<A: AllocGate> Queue<A> {
    /// Creates an empty queue whose allocations go through `alloc`.
    pub fn new_in(alloc: A) -> Result<Self, QueueError> {
        let sentinel = gate::try_box(&alloc, AllocKind::Sentinel, CircularLink::new())?;
        // SAFETY: `Box::into_raw` never returns null.
        let head = unsafe { NonNull::new_unchecked(Box::into_raw(sentinel)) };
        // SAFETY: `head` is a fresh, valid allocation.
        unsafe { OPS.init_head(head) };

        Ok(Queue {
            head,
            alloc,
            _owns: PhantomData,
        })
    }

    /// The allocation gate of this queue
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Inserts a copy of `value` at the front.
    ///
    /// On failure the queue is unchanged and nothing is leaked.
    pub fn insert_head(&mut self, value: &str) -> Result<(), QueueError> {
        let link = Element::into_link(Element::try_new(&self.alloc, value)?);
        // SAFETY: the head is initialised and `link` is a fresh, detached node.
        unsafe { OPS.insert_after(self.head, link) };
        Ok(())
    }

    /// Inserts a copy of `value` at the back.
    ///
    /// On failure the queue is unchanged and nothing is leaked.
    pub fn insert_tail(&mut self, value: &str) -> Result<(), QueueError> {
        let link = Element::into_link(Element::try_new(&self.alloc, value)?);
        // SAFETY: the head is initialised and `link` is a fresh, detached node.
        unsafe { OPS.insert_before(self.head, link) };
        Ok(())
    }

    /// Inserts copies of `values` at the back, in order.
    ///
    /// Stops at the first failure; values inserted before it stay.
    pub fn extend_tail<I, S>(&mut self, values: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.insert_tail(value.as_ref())?;
        }
        Ok(())
    }
}

impl<A> Queue<A> {
    pub(crate) fn head(&self) -> LinkPtr {
        self.head
    }

    /// Detaches the first element and hands it to the caller.
    ///
    /// With `out` supplied, the payload is also copied into it as a
    /// NUL-terminated byte string, truncated to fit (see
    /// [`Element::copy_value_to`]). Returns `None` if the queue is empty.
    pub fn remove_head(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>> {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe {
            if OPS.is_empty(self.head) {
                return None;
            }
            Some(Self::detach(OPS.succ(self.head), out))
        }
    }

    /// Detaches the last element and hands it to the caller.
    ///
    /// Same contract as [`remove_head`](Self::remove_head).
    pub fn remove_tail(&mut self, out: Option<&mut [u8]>) -> Option<Box<Element>> {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe {
            if OPS.is_empty(self.head) {
                return None;
            }
            Some(Self::detach(OPS.pred(self.head), out))
        }
    }

    unsafe fn detach(link: LinkPtr, out: Option<&mut [u8]>) -> Box<Element> {
        OPS.remove(link);
        let element = Element::from_link(link);
        if let Some(buf) = out {
            element.copy_value_to(buf);
        }
        element
    }

    /// Number of elements, counted by walking the ring.
    pub fn size(&self) -> usize {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { OPS.len(self.head) }
    }

    /// Returns `true` if the queue has no elements.
    pub fn is_empty(&self) -> bool {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { OPS.is_empty(self.head) }
    }

    /// Returns `true` if the queue has exactly one element.
    pub fn is_singular(&self) -> bool {
        // SAFETY: the head is initialised and owned by `self`.
        unsafe { OPS.is_singular(self.head) }
    }

    /// Payloads from front to back
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            head: self.head,
            // SAFETY: the head is initialised and owned by `self`.
            cursor: unsafe { OPS.succ(self.head) },
            _queue: PhantomData,
        }
    }

    /// Frees every element, leaving the queue empty.
    ///
    /// Returns how many elements were released.
    pub fn clear(&mut self) -> usize {
        // SAFETY: the head is initialised and every element came from
        // `Element::into_link`.
        unsafe { element::release_all(self.head) }
    }

    /// Checks that every node's neighbours point back at it.
    pub fn is_consistent(&self) -> bool {
        // SAFETY: every node reachable from the head is owned by `self`.
        unsafe { OPS.verify(self.head) }
    }

    /// Moves every element of `other` to the back of `self`.
    pub fn append<B>(&mut self, other: &mut Queue<B>) {
        // SAFETY: both heads are initialised and belong to distinct queues.
        unsafe { OPS.splice_before(other.head, self.head) };
    }

    /// Moves every element of `other` to the front of `self`.
    pub fn prepend<B>(&mut self, other: &mut Queue<B>) {
        // SAFETY: both heads are initialised and belong to distinct queues.
        unsafe { OPS.splice_after(other.head, self.head) };
    }
}

impl<A> Drop for Queue<A> {
    fn drop(&mut self) {
        let released = self.clear();
        if released > 0 {
            tracing::trace!(released, "queue freed");
        }
        // SAFETY: the sentinel came from `Box::into_raw` in `new_in` and no
        // element refers to it any more.
        unsafe {
            self.head.as_ref().force_unlink();
            drop(Box::from_raw(self.head.as_ptr()));
        }
    }
}

impl<A> fmt::Debug for Queue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, A> IntoIterator for &'a Queue<A> {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the payloads of a [`Queue`]
pub struct Iter<'a> {
    head: LinkPtr,
    cursor: LinkPtr,
    _queue: PhantomData<&'a Element>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.cursor == self.head {
            return None;
        }
        // SAFETY: the queue is borrowed for 'a, so the ring cannot change and
        // every non-head node is a live element.
        unsafe {
            let value = Element::value_of(self.cursor);
            self.cursor = OPS.succ(self.cursor);
            Some(value)
        }
    }
}

impl FusedIterator for Iter<'_> {}
