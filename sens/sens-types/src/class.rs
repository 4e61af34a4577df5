//! Kernel object classifications.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Class tag carried by every kernel object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectClass {
    /// A tessellation of a body.
    Tessellation,
    /// A topological body.
    Body,
    /// A face.
    Face,
    /// An edge.
    Edge,
    /// Anything else (models, contexts, geometry).
    Other,
}

/// Type of a body in a model's body table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyKind {
    /// Closed solid.
    Solid,
    /// Open sheet.
    Sheet,
    /// Wire (edges only).
    Wire,
    /// Single node.
    Node,
    /// Inactive slot.
    Null,
}

impl BodyKind {
    /// Whether this is the inactive sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Severity class of a kernel error record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    /// Continuation of a previous record.
    Continue,
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
    /// Status report.
    Status,
}

impl Severity {
    /// Decode a kernel severity code (`-1..=3`).
    ///
    /// # Example
    ///
    /// ```
    /// use sens_types::Severity;
    ///
    /// assert_eq!(Severity::from_code(-1), Some(Severity::Continue));
    /// assert_eq!(Severity::from_code(2), Some(Severity::Error));
    /// assert_eq!(Severity::from_code(4), None);
    /// ```
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Continue),
            0 => Some(Self::Info),
            1 => Some(Self::Warning),
            2 => Some(Self::Error),
            3 => Some(Self::Status),
            _ => None,
        }
    }

    /// Kernel code of this severity.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Continue => -1,
            Self::Info => 0,
            Self::Warning => 1,
            Self::Error => 2,
            Self::Status => 3,
        }
    }

    /// Fixed-width tag used when printing error records.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Continue => "Cont:   ",
            Self::Info => "Info:   ",
            Self::Warning => "Warning:",
            Self::Error => "Error:  ",
            Self::Status => "Status: ",
        }
    }
}
