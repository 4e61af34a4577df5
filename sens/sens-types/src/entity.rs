//! Topological entity references.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a tessellated topological entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// A boundary edge.
    Edge,
    /// A boundary face.
    Face,
}

/// A reference to one edge or face of a tessellated body.
///
/// Ids are 1-based. Kernels usually address edges with a negative id and
/// faces with a positive id when mapping local point indices to global ones;
/// that encoding only exists at the kernel boundary, see
/// [`EntityRef::signed_id`] and [`EntityRef::from_signed`].
///
/// # Example
///
/// ```
/// use sens_types::{EntityKind, EntityRef};
///
/// let edge = EntityRef::Edge(2);
/// assert_eq!(edge.kind(), EntityKind::Edge);
/// assert_eq!(edge.signed_id(), -2);
/// assert_eq!(EntityRef::from_signed(-2), Some(edge));
/// assert_eq!(EntityRef::from_signed(0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityRef {
    /// Edge with the given 1-based id.
    Edge(u32),
    /// Face with the given 1-based id.
    Face(u32),
}

impl EntityRef {
    /// Build a reference of the given kind.
    #[inline]
    #[must_use]
    pub const fn new(kind: EntityKind, id: u32) -> Self {
        match kind {
            EntityKind::Edge => Self::Edge(id),
            EntityKind::Face => Self::Face(id),
        }
    }

    /// The kind of entity referenced.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Edge(_) => EntityKind::Edge,
            Self::Face(_) => EntityKind::Face,
        }
    }

    /// The 1-based entity id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Edge(id) | Self::Face(id) => id,
        }
    }

    /// Signed id as used by kernel local-to-global lookups.
    ///
    /// Edges are negative, faces positive.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    // Entity ids never approach i32::MAX in practice; kernels store them as C ints
    pub const fn signed_id(self) -> i32 {
        match self {
            Self::Edge(id) => -(id as i32),
            Self::Face(id) => id as i32,
        }
    }

    /// Decode a signed kernel id. Returns `None` for zero.
    #[must_use]
    pub const fn from_signed(id: i32) -> Option<Self> {
        match id {
            0 => None,
            id if id < 0 => Some(Self::Edge(id.unsigned_abs())),
            #[allow(clippy::cast_sign_loss)]
            id => Some(Self::Face(id as u32)),
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edge(id) => write!(f, "edge {id}"),
            Self::Face(id) => write!(f, "face {id}"),
        }
    }
}
