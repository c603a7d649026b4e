//! Allocation gates
//!
//! Every allocation a queue makes (its sentinel, each element, each payload)
//! is first put to an [`AllocGate`]. The default [`Global`] gate admits
//! everything, so only genuine allocator failure can stop an insert.
//! [`FaultInjector`] refuses requests on a deterministic schedule, which is how
//! tests reach the failure paths.
//!
//! The gate only decides; the memory always comes from the global allocator.
//! Element storage is obtained with [`std::alloc::alloc`] and null-checked,
//! payload storage with [`String::try_reserve_exact`].
//!
//! # Example
//!
//! ```rust
//! use element_queue::gate::{AllocKind, FaultConfig, FaultInjector};
//! use element_queue::{Queue, QueueError};
//!
//! let injector = FaultInjector::new(FaultConfig::new().fail_after(2).only(AllocKind::Payload));
//! let mut queue = Queue::new_in(&injector).unwrap();
//!
//! queue.insert_tail("a").unwrap();
//! queue.insert_tail("b").unwrap();
//! assert_eq!(
//!     queue.insert_tail("c"),
//!     Err(QueueError::AllocFailed { kind: AllocKind::Payload })
//! );
//! assert_eq!(queue.size(), 2);
//! ```

use crate::error::QueueError;
use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

/// What an allocation is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocKind {
    /// The list head owned by a queue
    Sentinel,
    /// Storage for one element (link and payload handle)
    Element,
    /// The bytes of an element's payload
    Payload,
}

impl fmt::Display for AllocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocKind::Sentinel => write!(f, "sentinel"),
            AllocKind::Element => write!(f, "element"),
            AllocKind::Payload => write!(f, "payload"),
        }
    }
}

/// Decides whether an allocation may proceed
pub trait AllocGate {
    /// Returns `false` to make the allocation fail.
    fn admit(&self, kind: AllocKind, layout: Layout) -> bool;
}

impl<G: AllocGate + ?Sized> AllocGate for &G {
    #[inline]
    fn admit(&self, kind: AllocKind, layout: Layout) -> bool {
        (**self).admit(kind, layout)
    }
}

/// Gate that admits every request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl AllocGate for Global {
    #[inline]
    fn admit(&self, _kind: AllocKind, _layout: Layout) -> bool {
        true
    }
}

// ============================================================================
// Fault injection
// ============================================================================

/// Schedule for [`FaultInjector`]
///
/// Requests are numbered from 1 among the kinds the config applies to.
/// A request is refused when either rule matches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultConfig {
    fail_after: Option<usize>,
    fail_every: Option<usize>,
    kinds: Vec<AllocKind>,
}

impl FaultConfig {
    /// A config that refuses nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every request after the first `admitted` ones.
    pub fn fail_after(mut self, admitted: usize) -> Self {
        self.fail_after = Some(admitted);
        self
    }

    /// Refuse every `nth` request. Zero disables the rule.
    pub fn fail_every(mut self, nth: usize) -> Self {
        self.fail_every = Some(nth);
        self
    }

    /// Restrict the schedule to `kind`. May be called more than once; with
    /// no restriction every kind is subject to it.
    pub fn only(mut self, kind: AllocKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    fn applies_to(&self, kind: AllocKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    fn refuses(&self, request: usize) -> bool {
        self.fail_after.is_some_and(|limit| request > limit)
            || self
                .fail_every
                .is_some_and(|nth| nth > 0 && request % nth == 0)
    }
}

/// Gate that refuses requests according to a [`FaultConfig`]
///
/// Queues take the gate by value, so share one injector between queues (and
/// keep it inspectable from the test) by passing `&injector`.
#[derive(Debug)]
pub struct FaultInjector {
    config: FaultConfig,
    armed: Cell<bool>,
    requests: Cell<usize>,
    admitted: Cell<usize>,
    refused: Cell<usize>,
}

impl FaultInjector {
    /// Creates an armed injector.
    pub fn new(config: FaultConfig) -> Self {
        FaultInjector {
            config,
            armed: Cell::new(true),
            requests: Cell::new(0),
            admitted: Cell::new(0),
            refused: Cell::new(0),
        }
    }

    /// Creates an injector that admits everything until [`arm`](Self::arm)
    /// is called.
    pub fn disarmed(config: FaultConfig) -> Self {
        let injector = Self::new(config);
        injector.armed.set(false);
        injector
    }

    /// Starts applying the schedule. Request numbering restarts at 1.
    pub fn arm(&self) {
        self.requests.set(0);
        self.armed.set(true);
    }

    /// Stops applying the schedule; every request is admitted.
    pub fn disarm(&self) {
        self.armed.set(false);
    }

    /// Number of requests admitted so far
    pub fn admitted(&self) -> usize {
        self.admitted.get()
    }

    /// Number of requests refused so far
    pub fn refused(&self) -> usize {
        self.refused.get()
    }
}

impl AllocGate for FaultInjector {
    fn admit(&self, kind: AllocKind, layout: Layout) -> bool {
        if self.armed.get() && self.config.applies_to(kind) {
            let request = self.requests.get() + 1;
            self.requests.set(request);
            if self.config.refuses(request) {
                self.refused.set(self.refused.get() + 1);
                tracing::warn!(request, %kind, size = layout.size(), "injected allocation failure");
                return false;
            }
        }
        self.admitted.set(self.admitted.get() + 1);
        true
    }
}

// ============================================================================
// Checked allocation
// ============================================================================

/// Moves `value` into a fresh heap allocation, asking `gate` first.
pub(crate) fn try_box<T, G>(gate: &G, kind: AllocKind, value: T) -> Result<Box<T>, QueueError>
where
    G: AllocGate + ?Sized,
{
    let layout = Layout::new::<T>();
    if !gate.admit(kind, layout) {
        tracing::debug!(%kind, size = layout.size(), "allocation refused by gate");
        return Err(QueueError::AllocFailed { kind });
    }
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }

    // SAFETY: the layout has non-zero size.
    let raw = unsafe { std::alloc::alloc(layout) }.cast::<T>();
    let Some(ptr) = NonNull::new(raw) else {
        tracing::debug!(%kind, size = layout.size(), "system allocator returned null");
        return Err(QueueError::AllocFailed { kind });
    };

    // SAFETY: `ptr` was allocated with `Layout::new::<T>()` by the global
    // allocator, which is exactly what `Box<T>` expects to free.
    unsafe {
        ptr.as_ptr().write(value);
        Ok(Box::from_raw(ptr.as_ptr()))
    }
}

/// Copies `value` into newly owned payload storage, asking `gate` first.
pub(crate) fn try_copy_str<G>(gate: &G, value: &str) -> Result<String, QueueError>
where
    G: AllocGate + ?Sized,
{
    let kind = AllocKind::Payload;
    let layout = Layout::array::<u8>(value.len()).map_err(|_| QueueError::AllocFailed { kind })?;
    if !gate.admit(kind, layout) {
        tracing::debug!(%kind, size = layout.size(), "allocation refused by gate");
        return Err(QueueError::AllocFailed { kind });
    }

    let mut owned = String::new();
    if owned.try_reserve_exact(value.len()).is_err() {
        tracing::debug!(%kind, size = layout.size(), "payload reservation failed");
        return Err(QueueError::AllocFailed { kind });
    }
    owned.push_str(value);
    Ok(owned)
}
