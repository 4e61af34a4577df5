//! In-memory topological bodies.

use crate::{BodyTopology, KernelError, KernelObject, KernelResult};
use nalgebra::Point3;
use sens_types::{BodyKind, ObjectClass};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(1);

/// A body handle of the in-memory kernel.
///
/// Clones share identity; two separately constructed bodies never compare
/// equal, even with identical contents.
///
/// # Example
///
/// ```
/// use sens_kernel::MemoryBody;
///
/// let a = MemoryBody::solid(6);
/// let b = MemoryBody::solid(6);
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryBody {
    id: u64,
    kind: BodyKind,
    face_count: u32,
    valid: bool,
    class: ObjectClass,
    topology_ok: bool,
    geometry: Option<Arc<[Point3<f64>]>>,
}

impl MemoryBody {
    fn with_kind(kind: BodyKind, face_count: u32) -> Self {
        Self {
            id: NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            face_count,
            valid: true,
            class: ObjectClass::Body,
            topology_ok: true,
            geometry: None,
        }
    }

    /// A solid body with `face_count` faces.
    #[must_use]
    pub fn solid(face_count: u32) -> Self {
        Self::with_kind(BodyKind::Solid, face_count)
    }

    /// A sheet body with `face_count` faces.
    #[must_use]
    pub fn sheet(face_count: u32) -> Self {
        Self::with_kind(BodyKind::Sheet, face_count)
    }

    /// A wire body (no faces).
    #[must_use]
    pub fn wire() -> Self {
        Self::with_kind(BodyKind::Wire, 0)
    }

    /// Attach global point coordinates, indexed by global point − 1.
    #[must_use]
    pub fn with_geometry(mut self, points: Vec<Point3<f64>>) -> Self {
        self.geometry = Some(points.into());
        self
    }

    /// Mark the handle as corrupted (validity marker broken).
    #[must_use]
    pub fn corrupted(mut self) -> Self {
        self.valid = false;
        self
    }

    /// Override the object class tag.
    #[must_use]
    pub fn with_class(mut self, class: ObjectClass) -> Self {
        self.class = class;
        self
    }

    /// Make face count queries fail.
    #[must_use]
    pub fn without_topology(mut self) -> Self {
        self.topology_ok = false;
        self
    }

    /// Body type.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Global point coordinates, if attached.
    #[must_use]
    pub fn geometry(&self) -> Option<&[Point3<f64>]> {
        self.geometry.as_deref()
    }

    /// A new body with the same topology and the given coordinates.
    pub(crate) fn regenerate(&self, points: Vec<Point3<f64>>) -> Self {
        Self {
            id: NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed),
            geometry: Some(points.into()),
            ..self.clone()
        }
    }
}

impl PartialEq for MemoryBody {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl KernelObject for MemoryBody {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn object_class(&self) -> ObjectClass {
        self.class
    }
}

impl BodyTopology for MemoryBody {
    fn face_count(&self) -> KernelResult<u32> {
        if self.topology_ok {
            Ok(self.face_count)
        } else {
            Err(KernelError::Status {
                call: "get_body_topos",
                code: -1,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_survives_clone_only() {
        let body = MemoryBody::solid(1);
        let clone = body.clone();
        assert_eq!(body, clone);
        assert_ne!(body, MemoryBody::solid(1));
    }

    #[test]
    fn test_regenerate_is_new_identity() {
        let body = MemoryBody::solid(1).with_geometry(vec![Point3::origin()]);
        let rebuilt = body.regenerate(vec![Point3::new(1.0, 0.0, 0.0)]);
        assert_ne!(body, rebuilt);
        assert_eq!(rebuilt.face_count(), Ok(1));
        assert_eq!(rebuilt.geometry().map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_topology_failure() {
        let body = MemoryBody::solid(3).without_topology();
        assert!(body.face_count().is_err());
    }

    #[test]
    fn test_classification_flags() {
        let body = MemoryBody::wire().corrupted().with_class(ObjectClass::Face);
        assert!(!body.is_valid());
        assert_eq!(body.object_class(), ObjectClass::Face);
        assert_eq!(body.kind(), BodyKind::Wire);
    }
}
