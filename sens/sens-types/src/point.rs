//! Global point indices.

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tessellation-wide 1-based point index.
///
/// Every vertex of a tessellation has exactly one global index, shared by
/// all edges and faces that contain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalIndex(NonZeroU32);

impl GlobalIndex {
    /// Create an index. Returns `None` for zero.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Option<Self> {
        match NonZeroU32::new(index) {
            Some(index) => Some(Self(index)),
            None => None,
        }
    }

    /// The 1-based value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Offset of this point's `x` component in a flat `xyz` array.
    ///
    /// # Example
    ///
    /// ```
    /// use sens_types::GlobalIndex;
    ///
    /// assert_eq!(GlobalIndex::new(1).unwrap().offset(), 0);
    /// assert_eq!(GlobalIndex::new(4).unwrap().offset(), 9);
    /// ```
    #[inline]
    #[must_use]
    pub const fn offset(self) -> usize {
        3 * (self.0.get() as usize - 1)
    }
}

impl std::fmt::Display for GlobalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
