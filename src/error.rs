//! Error type for queue operations
//!
//! Only resource problems are errors. An empty queue, a bound that makes an
//! operation trivial, or a missing element is reported through `None`,
//! `false` or `0` from the operation itself.

use crate::gate::AllocKind;
use thiserror::Error;

/// Error type for queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// An allocation was refused by the gate or by the system allocator.
    ///
    /// Anything acquired before the failure has already been released.
    #[error("allocation failed for {kind} storage")]
    AllocFailed {
        /// Which allocation failed
        kind: AllocKind,
    },
    /// The queue handle is absent (see [`crate::ops`])
    #[error("queue handle is absent")]
    Absent,
}
