//! Checked tessellation handles.

use crate::error::{SensResult, SensitivityError};
use sens_kernel::{BodyTopology, KernelObject, ParametricModel, Tessellation};
use sens_types::{EntityRef, ObjectClass};
use std::iter::Map;
use std::ops::RangeInclusive;

/// A tessellation that passed validation, together with its body.
///
/// Construction performs every check needed before velocities are
/// scattered, so code holding a `ValidTess` never re-validates.
pub struct ValidTess<'a, T: Tessellation> {
    tess: &'a T,
    body: &'a T::Body,
    body_faces: u32,
    point_count: usize,
}

impl<T: Tessellation> std::fmt::Debug for ValidTess<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidTess")
            .field("body_faces", &self.body_faces)
            .field("point_count", &self.point_count)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Tessellation> ValidTess<'a, T> {
    /// Validate a tessellation handle.
    ///
    /// # Errors
    ///
    /// - [`SensitivityError::InvalidTessellation`] if the handle is absent,
    ///   corrupted, or not a tessellation
    /// - [`SensitivityError::InvalidTessellationBody`] if its status cannot
    ///   be read or its body is absent, corrupted, or not a body
    /// - [`SensitivityError::TopologyQuery`] if the body's faces cannot be
    ///   counted
    pub fn new(tess: Option<&'a T>) -> SensResult<Self> {
        let tess = tess.ok_or(SensitivityError::InvalidTessellation {
            reason: "no tessellation given",
        })?;
        if !tess.is_valid() {
            return Err(SensitivityError::InvalidTessellation {
                reason: "bad validity marker",
            });
        }
        if tess.object_class() != ObjectClass::Tessellation {
            return Err(SensitivityError::InvalidTessellation {
                reason: "object is not a tessellation",
            });
        }

        let status = tess
            .status()
            .map_err(|_| SensitivityError::InvalidTessellationBody {
                reason: "status query failed",
            })?;
        let body = status
            .body
            .ok_or(SensitivityError::InvalidTessellationBody {
                reason: "no body attached",
            })?;
        if !body.is_valid() {
            return Err(SensitivityError::InvalidTessellationBody {
                reason: "bad validity marker",
            });
        }
        if body.object_class() != ObjectClass::Body {
            return Err(SensitivityError::InvalidTessellationBody {
                reason: "object is not a body",
            });
        }

        let body_faces = body.face_count().map_err(SensitivityError::TopologyQuery)?;

        Ok(Self {
            tess,
            body,
            body_faces,
            point_count: status.point_count,
        })
    }

    /// The underlying tessellation.
    #[must_use]
    pub const fn tess(&self) -> &'a T {
        self.tess
    }

    /// The tessellated body.
    #[must_use]
    pub const fn body(&self) -> &'a T::Body {
        self.body
    }

    /// Number of global points.
    #[must_use]
    pub const fn point_count(&self) -> usize {
        self.point_count
    }

    /// Whether the body has no faces, so velocities come from its edges.
    #[must_use]
    pub const fn is_wireframe(&self) -> bool {
        self.body_faces == 0
    }

    /// The entities whose points carry velocities: every edge of a
    /// wireframe body, every face otherwise.
    pub fn entities(&self) -> Map<RangeInclusive<u32>, fn(u32) -> EntityRef> {
        let (count, entity): (u32, fn(u32) -> EntityRef) = if self.is_wireframe() {
            (self.tess.edge_count(), EntityRef::Edge)
        } else {
            (self.body_faces, EntityRef::Face)
        };
        (1..=count).map(entity)
    }

    /// The 1-based slot of this body among the model's active bodies.
    ///
    /// # Errors
    ///
    /// Returns [`SensitivityError::BodyNotInModel`] if no active slot holds
    /// this body.
    pub fn find_in_model<M>(&self, model: &M) -> SensResult<usize>
    where
        M: ParametricModel<Body = T::Body> + ?Sized,
    {
        model
            .bodies()
            .iter()
            .position(|slot| slot.is_active() && slot.body.as_ref() == Some(self.body))
            .map(|i| i + 1)
            .ok_or(SensitivityError::BodyNotInModel)
    }
}
