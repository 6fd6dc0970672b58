//! Contiguous node storage shared by every stack of a pool.

use alloc::vec::Vec;
use core::{fmt, slice};

use snafu::OptionExt as _;

use crate::{
    PoolError,
    index::{PoolIndex, Stack},
    pool_error::{IndexExhaustedSnafu, InvalidIndexSnafu},
};

/// One stored element and the index of its successor.
///
/// `released` is set while the node sits on the free list.
#[derive(Clone)]
pub(crate) struct Node<T, N> {
    pub(crate) value: T,
    pub(crate) next: Stack<N>,
    pub(crate) released: bool,
}

impl<T, N> fmt::Debug for Node<T, N>
where
    T: fmt::Debug,
    N: PoolIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("next", &self.next)
            .field("released", &self.released)
            .finish()
    }
}

/// The growable array owning every node of a pool.
///
/// Slot `i` is addressed by index `i + 1`. Slots are only ever appended;
/// a slot released by a stack is recycled through the pool's free list
/// instead of being removed from here.
#[derive(Clone)]
pub(crate) struct NodeStore<T, N> {
    nodes: Vec<Node<T, N>>,
}

impl<T, N> NodeStore<T, N>
where
    N: PoolIndex,
{
    pub(crate) const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn iter(&self) -> slice::Iter<'_, Node<T, N>> {
        self.nodes.iter()
    }

    /// Returns the live node addressed by `index`.
    ///
    /// Fails for the sentinel, for indices past the end of the store and for
    /// released nodes.
    #[track_caller]
    pub(crate) fn get(&self, index: Stack<N>) -> Result<&Node<T, N>, PoolError> {
        let len = self.nodes.len();
        index
            .head()
            .and_then(|slot| self.nodes.get(slot))
            .filter(|node| !node.released)
            .context(InvalidIndexSnafu {
                index: index.into_raw().to_u64(),
                len,
            })
    }

    /// Returns the live node addressed by `index` mutably.
    ///
    /// Fails for the sentinel, for indices past the end of the store and for
    /// released nodes.
    #[track_caller]
    pub(crate) fn get_mut(&mut self, index: Stack<N>) -> Result<&mut Node<T, N>, PoolError> {
        self.slot_mut(index, false)
    }

    /// Returns the released node addressed by `index` mutably.
    ///
    /// Only the free list reaches nodes through this.
    #[track_caller]
    pub(crate) fn get_released_mut(
        &mut self,
        index: Stack<N>,
    ) -> Result<&mut Node<T, N>, PoolError> {
        self.slot_mut(index, true)
    }

    #[track_caller]
    fn slot_mut(&mut self, index: Stack<N>, released: bool) -> Result<&mut Node<T, N>, PoolError> {
        let len = self.nodes.len();
        index
            .head()
            .and_then(|slot| self.nodes.get_mut(slot))
            .filter(|node| node.released == released)
            .context(InvalidIndexSnafu {
                index: index.into_raw().to_u64(),
                len,
            })
    }

    /// Appends a fresh node and returns its index.
    ///
    /// Fails without modifying the store if the new index does not fit in
    /// `N`.
    #[track_caller]
    pub(crate) fn append(&mut self, value: T, next: Stack<N>) -> Result<Stack<N>, PoolError> {
        let len = self.nodes.len();
        let index = Stack::from_slot(len).context(IndexExhaustedSnafu { len })?;
        self.nodes.push(Node {
            value,
            next,
            released: false,
        });
        Ok(index)
    }
}
