use core::fmt;

use snafu::GenerateImplicitData;

use crate::PoolError;

/// Source location where an error was raised.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(&'static core::panic::Location<'static>);

impl Location {
    /// Returns the location of the caller.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Self(core::panic::Location::caller())
    }

    #[must_use]
    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

impl GenerateImplicitData for Location {
    #[track_caller]
    fn generate() -> Self {
        Self::caller()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PoolError {
    /// Returns the location where this error was raised.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::StackUnderflow { location }
            | Self::InvalidIndex { location, .. }
            | Self::IndexExhausted { location, .. } => *location,
        }
    }

    /// Returns `true` if this error is [`PoolError::StackUnderflow`].
    #[must_use]
    pub fn is_stack_underflow(&self) -> bool {
        matches!(self, Self::StackUnderflow { .. })
    }

    /// Returns `true` if this error is [`PoolError::InvalidIndex`].
    #[must_use]
    pub fn is_invalid_index(&self) -> bool {
        matches!(self, Self::InvalidIndex { .. })
    }

    /// Returns `true` if this error is [`PoolError::IndexExhausted`].
    #[must_use]
    pub fn is_index_exhausted(&self) -> bool {
        matches!(self, Self::IndexExhausted { .. })
    }
}
