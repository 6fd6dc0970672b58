//! Formatting helpers for inspecting a pool.

use core::fmt;

use crate::{
    index::{PoolIndex, Stack},
    pool::StackPool,
};

/// Maximum number of slots listed by the `Debug` output of a pool.
const DEBUG_MAX_NODES: usize = 32;

/// Renders the values of one stack, head first, as `[7][5][3][1]`.
///
/// Created by [`StackPool::display_stack`].
pub struct DisplayStack<'a, T, N> {
    pool: &'a StackPool<T, N>,
    stack: Stack<N>,
}

impl<T, N> fmt::Display for DisplayStack<'_, T, N>
where
    T: fmt::Display,
    N: PoolIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.pool.iter(self.stack) {
            write!(f, "[{value}]")?;
        }
        Ok(())
    }
}

/// Renders the value of every slot of the node store in storage order,
/// including slots currently on the free list.
///
/// Created by [`StackPool::display_nodes`].
pub struct DisplayNodes<'a, T, N> {
    pool: &'a StackPool<T, N>,
}

impl<T, N> fmt::Display for DisplayNodes<'_, T, N>
where
    T: fmt::Display,
    N: PoolIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.pool.store().iter() {
            write!(f, "[{}]", node.value)?;
        }
        Ok(())
    }
}

impl<T, N> StackPool<T, N>
where
    N: PoolIndex,
{
    /// Returns an object that displays the values of `stack`, head first.
    ///
    /// # Examples
    ///
    /// ```
    /// use stack_pool::StackPool;
    ///
    /// let mut pool = StackPool::<u8>::new();
    /// let s = pool.push(1, pool.new_stack());
    /// let s = pool.push(2, s);
    /// assert_eq!(pool.display_stack(s).to_string(), "[2][1]");
    /// ```
    #[must_use]
    pub fn display_stack(&self, stack: Stack<N>) -> DisplayStack<'_, T, N> {
        DisplayStack { pool: self, stack }
    }

    /// Returns an object that displays every slot of the node store, in
    /// storage order.
    #[must_use]
    pub fn display_nodes(&self) -> DisplayNodes<'_, T, N> {
        DisplayNodes { pool: self }
    }
}

impl<T, N> fmt::Debug for StackPool<T, N>
where
    T: fmt::Debug,
    N: PoolIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Slots<'a, T, N>(&'a StackPool<T, N>);

        impl<T, N> fmt::Debug for Slots<'_, T, N>
        where
            T: fmt::Debug,
            N: PoolIndex,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                struct More(usize);
                impl fmt::Debug for More {
                    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "...({} more)", self.0)
                    }
                }

                let store = self.0.store();
                let mut dl = f.debug_list();
                dl.entries(
                    store
                        .iter()
                        .take(DEBUG_MAX_NODES)
                        .map(|node| (&node.value, node.next)),
                );
                if store.len() > DEBUG_MAX_NODES {
                    dl.entry(&More(store.len() - DEBUG_MAX_NODES));
                }
                dl.finish()
            }
        }

        f.debug_struct("StackPool")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("free", &self.free_head())
            .field("nodes", &Slots(self))
            .finish()
    }
}
