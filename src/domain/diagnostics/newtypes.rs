// SPDX-License-Identifier: MPL-2.0
//! Bounded capacity of the warning recorder.

use std::fmt;

/// How many warnings a recorder keeps before dropping the oldest.
///
/// Any `usize` converts; values outside [`MIN`](Self::MIN)..=[`MAX`](Self::MAX)
/// are clamped, so a config file can never produce a zero-sized or
/// unbounded recorder.
///
/// ```
/// use route_i18n::domain::diagnostics::BufferCapacity;
///
/// assert_eq!(BufferCapacity::new(64).get(), 64);
/// assert_eq!(BufferCapacity::from(0).get(), BufferCapacity::MIN);
/// assert_eq!(BufferCapacity::new(50_000).get(), BufferCapacity::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    pub const MIN: usize = 16;
    pub const MAX: usize = 4096;
    pub const DEFAULT: usize = 256;

    #[must_use]
    pub const fn new(value: usize) -> Self {
        let value = if value < Self::MIN {
            Self::MIN
        } else if value > Self::MAX {
            Self::MAX
        } else {
            value
        };
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<usize> for BufferCapacity {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl From<BufferCapacity> for usize {
    fn from(capacity: BufferCapacity) -> Self {
        capacity.0
    }
}

impl fmt::Display for BufferCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} messages", self.0)
    }
}
