//! Parameter table types.
//!
//! A parametric model exposes an ordered table of named parameters. Each
//! entry has a [`ParamKind`] and a `rows × cols` [`ParamShape`]; entries are
//! addressed by a 1-based [`ParamIndex`].

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 1-based index of an entry in a model's parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamIndex(NonZeroU32);

impl ParamIndex {
    /// Create an index. Returns `None` for zero.
    ///
    /// # Example
    ///
    /// ```
    /// use sens_types::ParamIndex;
    ///
    /// assert_eq!(ParamIndex::new(3).map(ParamIndex::get), Some(3));
    /// assert!(ParamIndex::new(0).is_none());
    /// ```
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
}

impl std::fmt::Display for ParamIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a parameter table entry.
///
/// Only [`ParamKind::Design`] entries can carry a sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamKind {
    /// Design parameter, an input that may carry a velocity.
    Design,
    /// Configuration parameter.
    Configuration,
    /// Constant parameter.
    Constant,
    /// Output (derived) parameter.
    Output,
    /// Local variable.
    Local,
    /// Unclassified entry.
    #[default]
    Unknown,
}

/// Declared `rows × cols` shape of a parameter.
///
/// Both dimensions are at least 1 for any parameter the kernel reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamShape {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
}

impl ParamShape {
    /// Create a shape.
    #[inline]
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// A `1 × 1` shape.
    #[inline]
    #[must_use]
    pub const fn scalar() -> Self {
        Self::new(1, 1)
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Whether the shape has no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Whether the 1-based `(row, col)` lies inside this shape.
    ///
    /// # Example
    ///
    /// ```
    /// use sens_types::ParamShape;
    ///
    /// let shape = ParamShape::new(2, 3);
    /// assert!(shape.contains(2, 3));
    /// assert!(!shape.contains(3, 1));
    /// assert!(!shape.contains(0, 1));
    /// ```
    #[inline]
    #[must_use]
    pub const fn contains(self, row: u32, col: u32) -> bool {
        row >= 1 && col >= 1 && row <= self.rows && col <= self.cols
    }

    /// Row-major storage offset of the 1-based `(row, col)`.
    ///
    /// Returns `None` when the entry lies outside the shape.
    #[inline]
    #[must_use]
    pub const fn flat_offset(self, row: u32, col: u32) -> Option<usize> {
        if self.contains(row, col) {
            Some((row as usize - 1) * self.cols as usize + (col as usize - 1))
        } else {
            None
        }
    }
}

impl Default for ParamShape {
    fn default() -> Self {
        Self::scalar()
    }
}

impl std::fmt::Display for ParamShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// One entry of a model's parameter table as reported by the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamInfo {
    /// Entry classification.
    pub kind: ParamKind,
    /// Declared shape.
    pub shape: ParamShape,
    /// Case-sensitive name, unique within the model.
    pub name: String,
}

impl ParamInfo {
    /// Create a table entry.
    #[must_use]
    pub fn new(kind: ParamKind, name: impl Into<String>, shape: ParamShape) -> Self {
        Self {
            kind,
            shape,
            name: name.into(),
        }
    }

    /// Create a design parameter entry.
    #[must_use]
    pub fn design(name: impl Into<String>, shape: ParamShape) -> Self {
        Self::new(ParamKind::Design, name, shape)
    }

    /// Whether this entry is a design parameter.
    #[inline]
    #[must_use]
    pub fn is_design(&self) -> bool {
        self.kind == ParamKind::Design
    }
}

/// A design parameter together with its table index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignParameter {
    /// Index in the parameter table.
    pub index: ParamIndex,
    /// Parameter name.
    pub name: String,
    /// Declared shape.
    pub shape: ParamShape,
}

/// Result of looking up a design parameter by name.
///
/// `NoSensitivity` is the reserved value for "no design parameter with this
/// name"; it cannot be turned into a [`ParamIndex`], so it can never reach
/// a velocity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamLookup {
    /// The parameter was found at this index.
    Index(ParamIndex),
    /// No design parameter with the requested name exists.
    NoSensitivity,
}

impl ParamLookup {
    /// The resolved index, if any.
    #[inline]
    #[must_use]
    pub const fn index(self) -> Option<ParamIndex> {
        match self {
            Self::Index(index) => Some(index),
            Self::NoSensitivity => None,
        }
    }

    /// Whether the lookup found nothing.
    #[inline]
    #[must_use]
    pub const fn is_no_sensitivity(self) -> bool {
        matches!(self, Self::NoSensitivity)
    }
}
