//! A pool of LIFO stacks sharing one contiguous node store.
//!
//! [`StackPool`] hosts any number of independent stacks. Their nodes live in
//! a single growable array and link to each other by index instead of by
//! pointer, so a stack is fully described by a small [`Stack`] handle: the
//! index of its head node.
//!
//! # Features
//!
//! - **Node recycling**: popped nodes go to a free list, which is just
//!   another stack in the same store, and are reused before the store grows
//! - **Stable handles**: growing the store never invalidates a handle
//! - **Compact indices**: the index type is generic, so a pool of at most
//!   255 nodes can use `u8` handles
//! - **No-std support**: only requires `alloc`
//!
//! # Examples
//!
//! ```
//! use stack_pool::StackPool;
//!
//! let mut pool = StackPool::<i32>::with_capacity(16);
//!
//! let mut l1 = pool.new_stack();
//! for v in [1, 3, 5, 7] {
//!     l1 = pool.push(v, l1);
//! }
//! let mut l2 = pool.new_stack();
//! for v in [2, 4, 6] {
//!     l2 = pool.push(v, l2);
//! }
//! assert_eq!(pool.display_stack(l1).to_string(), "[7][5][3][1]");
//! assert_eq!(pool.display_stack(l2).to_string(), "[6][4][2]");
//!
//! // The node released by `pop` is the next one handed out.
//! let len = pool.len();
//! l1 = pool.pop(l1)?;
//! l2 = pool.push(8, l2);
//! assert_eq!(pool.len(), len);
//! assert!(pool.iter(l1).eq(&[5, 3, 1]));
//! assert!(pool.iter(l2).eq(&[8, 6, 4, 2]));
//!
//! // Popping an empty stack is an error, not a silent read.
//! let err = pool.pop(pool.new_stack()).unwrap_err();
//! assert!(err.is_stack_underflow());
//! # Ok::<(), stack_pool::PoolError>(())
//! ```
//!
//! # Performance
//!
//! - `push`, `pop`, `value`, `next`: O(1), `push` amortized
//! - `free_stack`, `stack_len`: O(n) in the length of the stack
//! - Memory: one `(T, N)` pair per node ever allocated; the store never
//!   shrinks

#![cfg_attr(not(test), no_std)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

use snafu::Snafu;

pub use self::{
    cursor::Cursor,
    display::{DisplayNodes, DisplayStack},
    error::Location,
    index::{PoolIndex, Stack},
    pool::StackPool,
};

mod cursor;
mod display;
mod error;
mod index;
mod pool;
mod store;

/// Errors returned by [`StackPool`] operations.
///
/// A failed operation never modifies the pool.
#[derive(Debug, Snafu)]
#[snafu(module)]
pub enum PoolError {
    /// Attempted to pop from the empty stack.
    #[snafu(display("stack underflow: cannot pop from an empty stack"))]
    StackUnderflow {
        #[snafu(implicit)]
        location: Location,
    },
    /// Attempted to use the sentinel, an index past the end of the node
    /// store, or a node sitting on the free list.
    #[snafu(display("invalid node index {index}, node store holds {len} nodes"))]
    InvalidIndex {
        index: u64,
        len: usize,
        #[snafu(implicit)]
        location: Location,
    },
    /// The index type cannot address another node.
    #[snafu(display("node index space exhausted at {len} nodes"))]
    IndexExhausted {
        len: usize,
        #[snafu(implicit)]
        location: Location,
    },
}
