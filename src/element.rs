//! Queue elements
//!
//! An [`Element`] is one heap allocation holding a [`CircularLink`] and an
//! owned string payload. While it sits in a queue, the queue owns it through
//! the link alone; once removed it is handed out as a `Box<Element>`, and
//! dropping the box frees the payload and the element storage together.

use crate::error::QueueError;
use crate::gate::{self, AllocGate, AllocKind};
use crate::queue::OPS;
use intrusive_circular_list::{container_of_mut, CircularLink, LinkPtr};
use std::fmt;
use std::ptr::{self, NonNull};

/// A queue element: link plus owned payload
#[repr(C)]
pub struct Element {
    link: CircularLink,
    value: String,
}

impl Element {
    /// Allocates an element holding a copy of `value`.
    ///
    /// The element storage is acquired first. If the payload copy then
    /// fails, the element storage is released before returning.
    pub(crate) fn try_new<G>(gate: &G, value: &str) -> Result<Box<Element>, QueueError>
    where
        G: AllocGate + ?Sized,
    {
        let mut element = gate::try_box(
            gate,
            AllocKind::Element,
            Element {
                link: CircularLink::new(),
                value: String::new(),
            },
        )?;
        element.value = gate::try_copy_str(gate, value)?;
        Ok(element)
    }

    /// The payload
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Frees a removed element together with its payload.
    pub fn release(self: Box<Self>) {
        drop(self);
    }

    /// Takes the payload, releasing the element storage.
    pub fn into_value(mut self: Box<Self>) -> String {
        std::mem::take(&mut self.value)
    }

    /// Copies the payload into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` payload bytes are copied; longer payloads are
    /// truncated. The rest of `buf` is zero-filled. Returns the number of
    /// payload bytes copied. An empty `buf` receives nothing.
    pub fn copy_value_to(&self, buf: &mut [u8]) -> usize {
        let Some(room) = buf.len().checked_sub(1) else {
            return 0;
        };
        let bytes = self.value.as_bytes();
        let n = bytes.len().min(room);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf[n..].fill(0);
        n
    }

    /// Hands a boxed element over to raw ownership, returning its link.
    pub(crate) fn into_link(element: Box<Element>) -> LinkPtr {
        let raw = Box::into_raw(element);
        // SAFETY: `raw` comes from `Box::into_raw` and is never null.
        unsafe { NonNull::new_unchecked(ptr::addr_of_mut!((*raw).link)) }
    }

    /// Takes back ownership of the element embedding `link`.
    ///
    /// # Safety
    ///
    /// `link` must come from [`into_link`](Self::into_link), must be
    /// detached, and must not be used again.
    pub(crate) unsafe fn from_link(link: LinkPtr) -> Box<Element> {
        debug_assert!(!link.as_ref().is_linked(), "reclaiming a linked element");
        Box::from_raw(container_of_mut!(link.as_ptr(), Element, link))
    }

    /// Borrows the element embedding `link`.
    ///
    /// # Safety
    ///
    /// `link` must come from [`into_link`](Self::into_link) and the element
    /// must stay alive for `'a`.
    pub(crate) unsafe fn from_link_ref<'a>(link: LinkPtr) -> &'a Element {
        &*container_of_mut!(link.as_ptr(), Element, link)
    }

    /// Payload of the element embedding `link`.
    ///
    /// # Safety
    ///
    /// As for [`from_link_ref`](Self::from_link_ref).
    pub(crate) unsafe fn value_of<'a>(link: LinkPtr) -> &'a str {
        Self::from_link_ref(link).value()
    }
}

/// Unlinks and frees every element of the list headed by `head`.
///
/// Returns how many elements were released.
///
/// # Safety
///
/// `head` must be an initialised head whose elements all came from
/// [`Element::into_link`].
pub(crate) unsafe fn release_all(head: LinkPtr) -> usize {
    let mut released = 0;
    OPS.for_each_safe(head, |link| {
        OPS.remove(link);
        drop(Element::from_link(link));
        released += 1;
    });
    released
}

impl Drop for Element {
    fn drop(&mut self) {
        debug_assert!(!self.link.is_linked(), "element dropped while linked");
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("value", &self.value)
            .field("link", &self.link)
            .finish()
    }
}
