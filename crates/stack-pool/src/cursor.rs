use core::iter::FusedIterator;

use crate::{
    index::{PoolIndex, Stack},
    pool::StackPool,
};

/// A forward cursor over the values of one stack, from head to bottom.
///
/// A cursor borrows its pool, so the pool cannot be modified while the
/// cursor is alive. Cursors compare equal when they stand on the same node,
/// whichever stack they started from.
///
/// Created by [`StackPool::begin`], [`StackPool::end`] and
/// [`StackPool::iter`].
///
/// # Examples
///
/// ```
/// use stack_pool::StackPool;
///
/// let mut pool = StackPool::<char>::new();
/// let s = pool.push('a', pool.new_stack());
/// let s = pool.push('b', s);
///
/// let mut cursor = pool.begin(s);
/// let end = pool.end(s);
/// let mut seen = Vec::new();
/// while cursor != end {
///     seen.push(*cursor.get().unwrap());
///     cursor.advance();
/// }
/// assert_eq!(seen, ['b', 'a']);
/// ```
pub struct Cursor<'a, T, N = usize> {
    pool: &'a StackPool<T, N>,
    current: Stack<N>,
}

impl<'a, T, N> Cursor<'a, T, N>
where
    N: PoolIndex,
{
    pub(crate) fn new(pool: &'a StackPool<T, N>, start: Stack<N>) -> Self {
        Self {
            pool,
            current: start,
        }
    }

    /// Returns the node the cursor stands on, as a stack handle.
    ///
    /// This is the sentinel once the cursor reached the end.
    #[must_use]
    pub fn position(&self) -> Stack<N> {
        self.current
    }

    /// Returns `true` if the cursor is past the last node.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current.is_empty()
    }

    /// Returns the value under the cursor, or `None` at the end.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.pool.value(self.current).ok()
    }

    /// Moves the cursor to the next node.
    ///
    /// Advancing a cursor at the end, or standing on an index outside the
    /// pool, leaves it at the end.
    pub fn advance(&mut self) {
        self.current = self.pool.next(self.current).unwrap_or(Stack::EMPTY);
    }
}

impl<T, N> Clone for Cursor<'_, T, N>
where
    N: PoolIndex,
{
    fn clone(&self) -> Self {
        Self {
            pool: self.pool,
            current: self.current,
        }
    }
}

impl<T, N> PartialEq for Cursor<'_, T, N>
where
    N: PoolIndex,
{
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<T, N> Eq for Cursor<'_, T, N> where N: PoolIndex {}

impl<T, N> core::fmt::Debug for Cursor<'_, T, N>
where
    N: PoolIndex,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<'a, T, N> Iterator for Cursor<'a, T, N>
where
    N: PoolIndex,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pool.store().get(self.current).ok()?;
        self.current = node.next;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_end() {
            (0, Some(0))
        } else {
            (0, Some(self.pool.len()))
        }
    }
}

impl<T, N> FusedIterator for Cursor<'_, T, N> where N: PoolIndex {}
