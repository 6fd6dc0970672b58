//! Node indices and stack handles.
//!
//! Nodes are addressed by a 1-based index into the node store, so that the
//! value `0` is free to act as the sentinel: the empty stack, and the end of
//! every chain. The integer type is a parameter of the pool, which lets small
//! pools use narrow indices.

use core::{fmt, hash::Hash};

use platform_cast::CastFrom as _;

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer type usable as a node index.
///
/// The trait is sealed; it is implemented for `u8`, `u16`, `u32`, `u64` and
/// `usize`.
pub trait PoolIndex:
    sealed::Sealed + Copy + Eq + Ord + Hash + Default + fmt::Debug + fmt::Display
{
    /// The sentinel value, `0`.
    const SENTINEL: Self;

    /// Returns the 1-based index addressing the 0-based store `slot`.
    ///
    /// Returns `None` if the index does not fit in `Self`.
    fn from_slot(slot: usize) -> Option<Self>;

    /// Returns the 0-based store slot this index addresses.
    ///
    /// Returns `None` for the sentinel, and for values that cannot be a slot
    /// on this platform.
    fn to_slot(self) -> Option<usize>;

    /// Widens the index to `u64` for diagnostics.
    fn to_u64(self) -> u64;
}

macro_rules! impl_pool_index {
    ($($ty:ty => $widen:path),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl PoolIndex for $ty {
                const SENTINEL: Self = 0;

                fn from_slot(slot: usize) -> Option<Self> {
                    let index = slot.checked_add(1)?;
                    <$ty>::try_from(index).ok()
                }

                fn to_slot(self) -> Option<usize> {
                    let index = usize::try_from(self).ok()?;
                    index.checked_sub(1)
                }

                fn to_u64(self) -> u64 {
                    $widen(self)
                }
            }
        )*
    };
}

impl_pool_index!(
    u8 => u64::from,
    u16 => u64::from,
    u32 => u64::from,
    u64 => u64::from,
    usize => u64::cast_from,
);

/// A handle to one stack in a [`StackPool`](crate::StackPool).
///
/// The handle is the index of the stack's head node, or the sentinel for the
/// empty stack. It is a plain value: copying it does not copy the stack, and
/// every push or pop returns the new handle that replaces the old one.
///
/// # Examples
///
/// ```
/// use stack_pool::{Stack, StackPool};
///
/// let mut pool = StackPool::<&str>::new();
/// let stack = pool.new_stack();
/// assert!(stack.is_empty());
///
/// let stack = pool.push("a", stack);
/// assert!(!stack.is_empty());
/// assert_ne!(stack, Stack::EMPTY);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Stack<N = usize>(N);

impl<N> Stack<N>
where
    N: PoolIndex,
{
    /// The empty stack.
    pub const EMPTY: Self = Self(N::SENTINEL);

    /// Creates a handle from a raw index previously obtained from
    /// [`into_raw`](Self::into_raw).
    ///
    /// The value is not checked here; pool operations reject indices that
    /// do not address a node.
    #[must_use]
    pub const fn from_raw(index: N) -> Self {
        Self(index)
    }

    /// Returns the raw index of the head node, `0` for the empty stack.
    #[must_use]
    pub fn into_raw(self) -> N {
        self.0
    }

    /// Returns `true` if this is the empty stack.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == N::SENTINEL
    }

    /// Returns the store slot of the head node, or `None` for the empty stack.
    #[must_use]
    pub fn head(self) -> Option<usize> {
        self.0.to_slot()
    }

    pub(crate) fn from_slot(slot: usize) -> Option<Self> {
        N::from_slot(slot).map(Self)
    }
}

impl<N> Default for Stack<N>
where
    N: PoolIndex,
{
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<N> fmt::Debug for Stack<N>
where
    N: PoolIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Stack(EMPTY)")
        } else {
            write!(f, "Stack({})", self.0)
        }
    }
}

impl<N> fmt::Display for Stack<N>
where
    N: PoolIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
