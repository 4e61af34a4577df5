//! In-memory tessellations.

use crate::{KernelError, KernelObject, KernelResult, MemoryBody, TessStatus, Tessellation};
use nalgebra::Point3;
use sens_types::{EntityRef, GlobalIndex, ObjectClass};

/// A tessellation of a [`MemoryBody`].
///
/// Each edge and face is described by the global indices of its points in
/// local order, so local point `j` of an entity maps to the `j`-th listed
/// global index.
///
/// # Example
///
/// ```
/// use sens_kernel::{MemoryBody, MemoryTess, Tessellation};
/// use sens_types::{EntityRef, Point3};
///
/// let body = MemoryBody::solid(1);
/// let tess = MemoryTess::new(
///     body,
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
/// )
/// .with_face([1, 2, 3]);
///
/// assert_eq!(tess.face_count(), 1);
/// assert_eq!(tess.local_to_global(EntityRef::Face(1), 3).unwrap().get(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTess {
    valid: bool,
    class: ObjectClass,
    body: Option<MemoryBody>,
    status_code: Option<i32>,
    points: Vec<Point3<f64>>,
    edges: Vec<Vec<u32>>,
    faces: Vec<Vec<u32>>,
}

impl MemoryTess {
    /// A tessellation of `body` with the given global point coordinates.
    #[must_use]
    pub fn new(body: MemoryBody, points: Vec<Point3<f64>>) -> Self {
        Self {
            valid: true,
            class: ObjectClass::Tessellation,
            body: Some(body),
            status_code: None,
            points,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// A tessellation that is not attached to any body.
    #[must_use]
    pub fn detached(points: Vec<Point3<f64>>) -> Self {
        Self {
            body: None,
            ..Self::new(MemoryBody::wire(), points)
        }
    }

    /// Append an edge whose local points map to `globals` in order.
    #[must_use]
    pub fn with_edge(mut self, globals: impl Into<Vec<u32>>) -> Self {
        self.edges.push(globals.into());
        self
    }

    /// Append a face whose local points map to `globals` in order.
    #[must_use]
    pub fn with_face(mut self, globals: impl Into<Vec<u32>>) -> Self {
        self.faces.push(globals.into());
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

    /// Make status queries fail with `code`.
    #[must_use]
    pub fn with_status_failure(mut self, code: i32) -> Self {
        self.status_code = Some(code);
        self
    }

    /// The tessellated body, if attached.
    #[must_use]
    pub const fn body(&self) -> Option<&MemoryBody> {
        self.body.as_ref()
    }

    /// Global point coordinates, indexed by global point − 1.
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    fn entity_points(&self, entity: EntityRef) -> KernelResult<&[u32]> {
        let (list, what) = match entity {
            EntityRef::Edge(_) => (&self.edges, "edge"),
            EntityRef::Face(_) => (&self.faces, "face"),
        };
        let id = entity.id() as usize;
        id.checked_sub(1)
            .and_then(|i| list.get(i))
            .map(Vec::as_slice)
            .ok_or(KernelError::OutOfRange {
                what,
                index: i64::from(entity.id()),
                count: list.len(),
            })
    }
}

impl KernelObject for MemoryTess {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn object_class(&self) -> ObjectClass {
        self.class
    }
}

impl Tessellation for MemoryTess {
    type Body = MemoryBody;

    fn status(&self) -> KernelResult<TessStatus<'_, MemoryBody>> {
        if let Some(code) = self.status_code {
            return Err(KernelError::Status {
                call: "status_tess_body",
                code,
            });
        }
        Ok(TessStatus {
            body: self.body.as_ref(),
            complete: true,
            point_count: self.points.len(),
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn face_count(&self) -> u32 {
        self.faces.len() as u32
    }

    fn point_count(&self, entity: EntityRef) -> KernelResult<usize> {
        self.entity_points(entity).map(<[u32]>::len)
    }

    fn local_to_global(&self, entity: EntityRef, local: u32) -> KernelResult<GlobalIndex> {
        let globals = self.entity_points(entity)?;
        let out_of_range = KernelError::OutOfRange {
            what: "local point",
            index: i64::from(local),
            count: globals.len(),
        };
        let global = (local as usize)
            .checked_sub(1)
            .and_then(|j| globals.get(j))
            .ok_or(out_of_range)?;
        GlobalIndex::new(*global).ok_or(KernelError::OutOfRange {
            what: "global point",
            index: 0,
            count: self.points.len(),
        })
    }

    fn global_point(&self, global: GlobalIndex) -> KernelResult<Point3<f64>> {
        self.points
            .get(global.get() as usize - 1)
            .copied()
            .ok_or(KernelError::OutOfRange {
                what: "global point",
                index: i64::from(global.get()),
                count: self.points.len(),
            })
    }

    fn map_to_body(&self, body: &MemoryBody) -> KernelResult<Self> {
        let geometry = body.geometry().ok_or(KernelError::Missing {
            what: "body geometry",
        })?;
        if geometry.len() != self.points.len() {
            return Err(KernelError::Status {
                call: "map_tess_body",
                code: -3,
            });
        }
        Ok(Self {
            body: Some(body.clone()),
            points: geometry.to_vec(),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> MemoryTess {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        MemoryTess::new(MemoryBody::solid(1), points)
            .with_face([1, 2, 3, 4])
            .with_edge([1, 2])
            .with_edge([2, 3])
    }

    #[test]
    fn test_local_to_global_follows_listing() {
        let tess = square();
        assert_eq!(tess.local_to_global(EntityRef::Edge(2), 1).unwrap().get(), 2);
        assert_eq!(tess.local_to_global(EntityRef::Edge(2), 2).unwrap().get(), 3);
        assert_eq!(tess.local_to_global(EntityRef::Face(1), 4).unwrap().get(), 4);
    }

    #[test]
    fn test_out_of_range_lookups() {
        let tess = square();
        assert!(tess.local_to_global(EntityRef::Edge(3), 1).is_err());
        assert!(tess.local_to_global(EntityRef::Face(1), 0).is_err());
        assert!(tess.local_to_global(EntityRef::Face(1), 5).is_err());
        assert!(tess.point_count(EntityRef::Face(0)).is_err());
        assert!(tess.global_point(GlobalIndex::new(5).unwrap()).is_err());
    }

    #[test]
    fn test_status_reports_body_and_points() {
        let tess = square();
        let status = tess.status().unwrap();
        assert_eq!(status.point_count, 4);
        assert_eq!(status.body, tess.body());
        assert!(MemoryTess::detached(Vec::new()).status().unwrap().body.is_none());
        assert!(square().with_status_failure(-2).status().is_err());
    }

    #[test]
    fn test_map_to_body_requires_matching_geometry() {
        let tess = square();
        let short = MemoryBody::solid(1).with_geometry(vec![Point3::origin()]);
        assert!(tess.map_to_body(&short).is_err());
        assert!(tess.map_to_body(&MemoryBody::solid(1)).is_err());

        let moved: Vec<_> = tess.points().iter().map(|p| p + nalgebra::Vector3::z()).collect();
        let target = MemoryBody::solid(1).with_geometry(moved);
        let mapped = tess.map_to_body(&target).unwrap();
        assert_eq!(mapped.body(), Some(&target));
        assert!((mapped.points()[2].z - 1.0).abs() < f64::EPSILON);
        assert_eq!(mapped.face_count(), 1);
    }
}
