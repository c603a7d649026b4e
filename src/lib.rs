//! In-place string queue on an intrusive circular doubly-linked list
//!
//! Each element owns one string payload and carries its own `next`/`prev`
//! links, so the queue never allocates a container for its elements. A
//! queue is a heap-allocated sentinel; the elements are the rest of the
//! ring. All structural work (cutting, splicing, reversing, merging) is link
//! rewiring on that ring.
//!
//! # Operations
//!
//! - **Structure**: O(1) insert/remove at either end, splicing whole queues,
//!   O(n) `size` (no count is cached)
//! - **Transforms**: `reverse`, `reverse_k`, `swap`, `delete_dup`, `delete_mid`
//! - **Ordering**: stable `merge_from` and merge `sort`, ascending or
//!   descending by byte-wise payload comparison
//! - **Filters**: `ascend` / `descend` keep only elements that are extremal
//!   relative to everything on their right
//! - **Multi-queue**: [`merge_all`] folds any number of queues into one
//!
//! Allocations go through an [`AllocGate`](gate::AllocGate), which lets tests
//! inject failures with [`FaultInjector`](gate::FaultInjector). Callers that
//! hold a possibly-absent queue use the [`ops`] functions.
//!
//! # Example
//!
//! ```rust
//! use element_queue::Queue;
//!
//! let mut queue = Queue::new().unwrap();
//! for value in ["a", "b", "c"] {
//!     queue.insert_tail(value).unwrap();
//! }
//!
//! let first = queue.remove_head(None).unwrap();
//! assert_eq!(first.value(), "a");
//!
//! queue.sort(false);
//! queue.reverse();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["c", "b"]);
//! ```

pub mod element;
pub mod error;
mod filter;
pub mod gate;
mod merge;
pub mod ops;
pub mod queue;
mod sort;
mod transform;

pub use element::Element;
pub use error::QueueError;
pub use merge::merge_all;
pub use queue::{Iter, Queue};
