//! The stack pool: many LIFO stacks sharing one node store.

use log::{debug, trace};
use snafu::ensure;

use crate::{
    PoolError,
    cursor::Cursor,
    index::{PoolIndex, Stack},
    pool_error::StackUnderflowSnafu,
    store::NodeStore,
};

/// A pool of LIFO stacks backed by a single contiguous node store.
///
/// Each stack is identified by a [`Stack`] handle, the index of its head
/// node. Nodes released by [`pop`](Self::pop) are threaded onto an internal
/// free list, itself a stack living in the same store, and are handed out
/// again by [`push`](Self::push) before the store grows.
///
/// `N` is the integer type of node indices. A pool can hold at most
/// `N::MAX` nodes.
///
/// Handles stay valid when the store reallocates, since they are indices and
/// not pointers. A handle must only be used with the pool that produced it,
/// and a handle replaced by the result of `push` or `pop` must not be used
/// again. A handle whose node was released is rejected with
/// [`PoolError::InvalidIndex`] until the node is reused; once it is, the old
/// handle aliases the new stack.
///
/// # Examples
///
/// ```
/// use stack_pool::StackPool;
///
/// let mut pool = StackPool::<i32>::with_capacity(16);
///
/// let mut a = pool.new_stack();
/// for v in [1, 3, 5, 7] {
///     a = pool.push(v, a);
/// }
/// let mut b = pool.new_stack();
/// for v in [2, 4, 6] {
///     b = pool.push(v, b);
/// }
///
/// assert!(pool.iter(a).eq(&[7, 5, 3, 1]));
/// assert!(pool.iter(b).eq(&[6, 4, 2]));
///
/// a = pool.pop(a)?;
/// assert_eq!(*pool.value(a)?, 5);
/// # Ok::<(), stack_pool::PoolError>(())
/// ```
#[derive(Clone)]
pub struct StackPool<T, N = usize> {
    store: NodeStore<T, N>,
    free: Stack<N>,
    free_len: usize,
}

impl<T, N> Default for StackPool<T, N>
where
    N: PoolIndex,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, N> StackPool<T, N>
where
    N: PoolIndex,
{
    /// Creates an empty pool. No memory is allocated until the first push.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            store: NodeStore::new(),
            free: Stack::EMPTY,
            free_len: 0,
        }
    }

    /// Creates an empty pool with room for at least `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: NodeStore::with_capacity(capacity),
            free: Stack::EMPTY,
            free_len: 0,
        }
    }

    /// Returns the number of nodes the store can hold without reallocating.
    ///
    /// This is unrelated to the number of live nodes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Reserves room for at least `additional` more nodes in the store.
    ///
    /// This only affects performance; it never changes any stack.
    pub fn reserve(&mut self, additional: usize) {
        debug!(
            "reserving {additional} nodes (len={}, capacity={})",
            self.store.len(),
            self.store.capacity()
        );
        self.store.reserve(additional);
    }

    /// Returns the number of nodes in the store, live and free.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no node was ever allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the number of nodes waiting on the free list.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free_len
    }

    /// Returns a new, empty stack. This does not consume any storage.
    #[must_use]
    pub fn new_stack(&self) -> Stack<N> {
        Stack::EMPTY
    }

    /// Returns `true` if `stack` is the empty stack.
    #[must_use]
    pub fn empty(&self, stack: Stack<N>) -> bool {
        stack.is_empty()
    }

    /// Pushes `value` on top of `stack` and returns the new head.
    ///
    /// A node from the free list is reused if there is one; otherwise a new
    /// node is appended to the store.
    ///
    /// # Panics
    ///
    /// Panics if the free list is empty and the store already holds
    /// `N::MAX` nodes. Use [`try_push`](Self::try_push) to handle this case.
    ///
    /// # Examples
    ///
    /// ```
    /// use stack_pool::StackPool;
    ///
    /// let mut pool = StackPool::<&str>::new();
    /// let s = pool.push("bottom", pool.new_stack());
    /// let s = pool.push("top", s);
    /// assert_eq!(*pool.value(s).unwrap(), "top");
    /// ```
    #[track_caller]
    pub fn push(&mut self, value: T, stack: Stack<N>) -> Stack<N> {
        match self.try_push(value, stack) {
            Ok(head) => head,
            Err(err) => panic!("{err}"),
        }
    }

    /// Pushes `value` on top of `stack` and returns the new head.
    ///
    /// Fails with [`PoolError::IndexExhausted`] if the free list is empty and
    /// `N` cannot address another node. The pool is unchanged on failure and
    /// `value` is dropped.
    #[track_caller]
    pub fn try_push(&mut self, value: T, stack: Stack<N>) -> Result<Stack<N>, PoolError> {
        let head = self.free;
        if head.is_empty() {
            let head = self.store.append(value, stack)?;
            trace!("pushed onto fresh node {head} (len={})", self.store.len());
            return Ok(head);
        }

        let node = self.store.get_released_mut(head)?;
        node.value = value;
        node.released = false;
        self.free = node.next;
        self.free_len -= 1;
        node.next = stack;
        trace!("pushed onto recycled node {head}");
        Ok(head)
    }

    /// Removes the head node of `stack` and returns the new head.
    ///
    /// The removed node goes to the free list; its value stays in the store
    /// until the node is reused.
    ///
    /// Fails with [`PoolError::StackUnderflow`] if `stack` is empty, and with
    /// [`PoolError::InvalidIndex`] if it is not a live node of this pool,
    /// which includes a node already released by an earlier `pop`. The pool
    /// is unchanged on failure.
    #[track_caller]
    pub fn pop(&mut self, stack: Stack<N>) -> Result<Stack<N>, PoolError> {
        ensure!(!stack.is_empty(), StackUnderflowSnafu);

        let node = self.store.get_mut(stack)?;
        let next = node.next;
        node.next = self.free;
        node.released = true;
        self.free = stack;
        self.free_len += 1;
        trace!("released node {stack} to the free list");
        Ok(next)
    }

    /// Removes the head node of `stack`, returning a copy of its value and
    /// the new head.
    #[track_caller]
    pub fn pop_value(&mut self, stack: Stack<N>) -> Result<(T, Stack<N>), PoolError>
    where
        T: Clone,
    {
        ensure!(!stack.is_empty(), StackUnderflowSnafu);

        let value = self.store.get(stack)?.value.clone();
        let next = self.pop(stack)?;
        Ok((value, next))
    }

    /// Releases every node of `stack` to the free list and returns the empty
    /// stack.
    ///
    /// Nodes are released head first, so the old bottom of the stack becomes
    /// the next node handed out by [`push`](Self::push).
    pub fn free_stack(&mut self, stack: Stack<N>) -> Stack<N> {
        let mut stack = stack;
        let mut released = 0_usize;
        while let Ok(next) = self.pop(stack) {
            stack = next;
            released += 1;
        }
        trace!("freed a stack of {released} nodes");
        Stack::EMPTY
    }

    /// Returns a reference to the value at the head of `stack`.
    ///
    /// Fails with [`PoolError::InvalidIndex`] if `stack` is empty or is not a
    /// live node of this pool.
    #[track_caller]
    pub fn value(&self, stack: Stack<N>) -> Result<&T, PoolError> {
        Ok(&self.store.get(stack)?.value)
    }

    /// Returns a mutable reference to the value at the head of `stack`.
    ///
    /// Fails with [`PoolError::InvalidIndex`] if `stack` is empty or is not a
    /// live node of this pool.
    #[track_caller]
    pub fn value_mut(&mut self, stack: Stack<N>) -> Result<&mut T, PoolError> {
        Ok(&mut self.store.get_mut(stack)?.value)
    }

    /// Returns the successor of the head node of `stack`, which is the stack
    /// without its head.
    ///
    /// Fails with [`PoolError::InvalidIndex`] if `stack` is empty or is not a
    /// live node of this pool.
    #[track_caller]
    pub fn next(&self, stack: Stack<N>) -> Result<Stack<N>, PoolError> {
        Ok(self.store.get(stack)?.next)
    }

    /// Returns the number of nodes in `stack`.
    ///
    /// This walks the whole chain.
    #[must_use]
    pub fn stack_len(&self, stack: Stack<N>) -> usize {
        self.iter(stack).count()
    }

    /// Returns a cursor positioned at the head of `stack`.
    #[must_use]
    pub fn begin(&self, stack: Stack<N>) -> Cursor<'_, T, N> {
        Cursor::new(self, stack)
    }

    /// Returns the cursor one past the bottom of `stack`.
    ///
    /// The end cursor of every stack sits at the sentinel.
    #[must_use]
    pub fn end(&self, _stack: Stack<N>) -> Cursor<'_, T, N> {
        Cursor::new(self, Stack::EMPTY)
    }

    /// Returns an iterator over the values of `stack`, from head to bottom.
    ///
    /// This is the same cursor as [`begin`](Self::begin).
    #[must_use]
    pub fn iter(&self, stack: Stack<N>) -> Cursor<'_, T, N> {
        self.begin(stack)
    }

    pub(crate) fn store(&self) -> &NodeStore<T, N> {
        &self.store
    }

    pub(crate) fn free_head(&self) -> Stack<N> {
        self.free
    }
}

#[cfg(test)]
mod tests {
    use alloc::{vec, vec::Vec};

    use super::*;

    fn push_all<N>(pool: &mut StackPool<i32, N>, values: &[i32]) -> Stack<N>
    where
        N: PoolIndex,
    {
        values
            .iter()
            .fold(pool.new_stack(), |stack, &v| pool.push(v, stack))
    }

    fn collect<N>(pool: &StackPool<i32, N>, stack: Stack<N>) -> Vec<i32>
    where
        N: PoolIndex,
    {
        pool.iter(stack).copied().collect()
    }

    #[test]
    fn test_new_stack_is_empty() {
        let pool = StackPool::<i32>::new();
        let stack = pool.new_stack();
        assert!(pool.empty(stack));
        assert_eq!(stack, Stack::EMPTY);
        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn test_pop_returns_lifo_order() {
        let mut pool = StackPool::<i32>::new();
        let mut stack = push_all(&mut pool, &[1, 2, 3, 4, 5]);

        let mut popped = Vec::new();
        while !pool.empty(stack) {
            let (value, next) = pool.pop_value(stack).unwrap();
            popped.push(value);
            stack = next;
        }
        assert_eq!(popped, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_push_then_pop_restores_handle() {
        let mut pool = StackPool::<i32>::new();
        let stack = push_all(&mut pool, &[10, 20]);

        let pushed = pool.push(30, stack);
        assert_eq!(*pool.value(pushed).unwrap(), 30);
        assert_eq!(pool.next(pushed).unwrap(), stack);

        let popped = pool.pop(pushed).unwrap();
        assert_eq!(popped, stack);
        assert_eq!(collect(&pool, popped), vec![20, 10]);
    }

    #[test]
    fn test_empty_after_single_pop() {
        let mut pool = StackPool::<i32>::new();
        let stack = pool.push(1, pool.new_stack());
        assert!(!pool.empty(stack));

        let stack = pool.pop(stack).unwrap();
        assert!(pool.empty(stack));
    }

    #[test]
    fn test_pop_empty_underflows_without_change() {
        let mut pool = StackPool::<i32>::new();
        let stack = push_all(&mut pool, &[1, 2]);
        let freed = pool.pop(stack).unwrap();
        let len = pool.len();
        let free_head = pool.free_head();

        let err = pool.pop(pool.new_stack()).unwrap_err();
        assert!(err.is_stack_underflow());
        assert_eq!(pool.len(), len);
        assert_eq!(pool.free_head(), free_head);
        assert_eq!(collect(&pool, freed), vec![1]);
    }

    #[test]
    fn test_accessors_reject_sentinel() {
        let mut pool = StackPool::<i32>::new();
        let _stack = pool.push(1, pool.new_stack());

        assert!(pool.value(Stack::EMPTY).unwrap_err().is_invalid_index());
        assert!(pool.value_mut(Stack::EMPTY).unwrap_err().is_invalid_index());
        assert!(pool.next(Stack::EMPTY).unwrap_err().is_invalid_index());
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut pool = StackPool::<i32>::new();
        let _stack = pool.push(1, pool.new_stack());
        let foreign = Stack::from_raw(99);

        assert!(pool.value(foreign).unwrap_err().is_invalid_index());
        assert!(pool.pop(foreign).unwrap_err().is_invalid_index());
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_released_handle_cannot_be_popped_again() {
        let mut pool = StackPool::<i32>::new();
        let stack = pool.push(10, pool.new_stack());
        let _ = pool.pop(stack).unwrap();

        let err = pool.pop(stack).unwrap_err();
        assert!(matches!(err, PoolError::InvalidIndex { index: 1, len: 1, .. }));
        assert_eq!(pool.free_len(), 1);
        assert_eq!(pool.free_head(), stack);

        assert!(pool.value(stack).unwrap_err().is_invalid_index());
        assert!(pool.value_mut(stack).unwrap_err().is_invalid_index());
        assert!(pool.next(stack).unwrap_err().is_invalid_index());
        assert_eq!(pool.stack_len(stack), 0);

        // The free list still hands out each node once.
        let x = pool.push(20, pool.new_stack());
        let y = pool.push(30, pool.new_stack());
        assert_ne!(x, y);
        assert_eq!(*pool.value(x).unwrap(), 20);
        assert_eq!(*pool.value(y).unwrap(), 30);
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_pop_value_errors() {
        let mut pool = StackPool::<i32>::new();
        let stack = pool.push(1, pool.new_stack());

        let err = pool.pop_value(pool.new_stack()).unwrap_err();
        assert!(err.is_stack_underflow());
        let err = pool.pop_value(Stack::from_raw(7)).unwrap_err();
        assert!(matches!(err, PoolError::InvalidIndex { index: 7, len: 1, .. }));
        assert_eq!(pool.free_len(), 0);

        let (value, rest) = pool.pop_value(stack).unwrap();
        assert_eq!((value, rest), (1, Stack::EMPTY));
        assert!(pool.pop_value(stack).unwrap_err().is_invalid_index());
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn test_value_mut_updates_head() {
        let mut pool = StackPool::<i32>::new();
        let stack = push_all(&mut pool, &[1, 2]);

        *pool.value_mut(stack).unwrap() += 40;
        assert_eq!(collect(&pool, stack), vec![42, 1]);
    }

    #[test]
    fn test_freed_node_is_reused_first() {
        let mut pool = StackPool::<i32>::new();
        let a = push_all(&mut pool, &[1, 3, 5, 7]);
        let b = push_all(&mut pool, &[2, 4, 6]);
        let len = pool.len();

        let a = pool.pop(a).unwrap();
        assert_eq!(pool.free_len(), 1);

        let b2 = pool.push(8, b);
        assert_eq!(pool.len(), len);
        assert_eq!(pool.free_len(), 0);
        assert_eq!(collect(&pool, b2), vec![8, 6, 4, 2]);
        assert_eq!(collect(&pool, a), vec![5, 3, 1]);
    }

    #[test]
    fn test_free_list_is_lifo() {
        let mut pool = StackPool::<i32>::new();
        let a = pool.push(1, pool.new_stack());
        let b = pool.push(2, pool.new_stack());

        let _ = pool.pop(a).unwrap();
        let _ = pool.pop(b).unwrap();

        // `b` was released last, so it is handed out first.
        let c = pool.push(3, pool.new_stack());
        assert_eq!(c, b);
        let d = pool.push(4, pool.new_stack());
        assert_eq!(d, a);
    }

    #[test]
    fn test_free_stack_recycles_without_growth() {
        let mut pool = StackPool::<i32>::with_capacity(8);
        let stack = push_all(&mut pool, &[1, 2, 3, 4]);
        let capacity = pool.capacity();

        let stack = pool.free_stack(stack);
        assert_eq!(stack, pool.new_stack());
        assert_eq!(pool.free_len(), 4);

        let stack = push_all(&mut pool, &[5, 6, 7]);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.capacity(), capacity);
        assert_eq!(pool.free_len(), 1);
        assert_eq!(collect(&pool, stack), vec![7, 6, 5]);
    }

    #[test]
    fn test_free_stack_on_empty() {
        let mut pool = StackPool::<i32>::new();
        let stack = pool.free_stack(pool.new_stack());
        assert!(pool.empty(stack));
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_stacks_are_independent() {
        let mut pool = StackPool::<i32, u16>::new();
        let mut a = pool.new_stack();
        let mut b = pool.new_stack();
        for i in 0..10 {
            a = pool.push(i, a);
            b = pool.push(-i, b);
        }
        let b_before = collect(&pool, b);

        a = pool.pop(a).unwrap();
        a = pool.pop(a).unwrap();
        a = pool.push(100, a);
        *pool.value_mut(a).unwrap() = 200;

        assert_eq!(collect(&pool, b), b_before);
        assert_eq!(pool.stack_len(a), 9);
        assert_eq!(pool.stack_len(b), 10);
    }

    #[test]
    fn test_try_push_reports_exhaustion() {
        let mut pool = StackPool::<i32, u8>::new();
        let mut stack = pool.new_stack();
        for i in 0..255 {
            stack = pool.try_push(i, stack).unwrap();
        }

        let err = pool.try_push(255, stack).unwrap_err();
        assert!(err.is_index_exhausted());
        assert_eq!(pool.len(), 255);
        assert_eq!(pool.stack_len(stack), 255);

        // A released node can still be reused.
        let popped = pool.pop(stack).unwrap();
        let stack = pool.try_push(-1, popped).unwrap();
        assert_eq!(*pool.value(stack).unwrap(), -1);
    }

    #[test]
    #[should_panic(expected = "node index space exhausted at 255 nodes")]
    fn test_push_panics_on_exhaustion() {
        let mut pool = StackPool::<i32, u8>::new();
        let mut stack = pool.new_stack();
        for i in 0..256 {
            stack = pool.push(i, stack);
        }
    }

    #[test]
    fn test_reserve_does_not_change_stacks() {
        let mut pool = StackPool::<i32>::new();
        let stack = push_all(&mut pool, &[1, 2, 3]);

        pool.reserve(1024);
        assert!(pool.capacity() >= 1024);
        assert_eq!(pool.len(), 3);
        assert_eq!(collect(&pool, stack), vec![3, 2, 1]);
    }
}
