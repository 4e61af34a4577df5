//! Tessellation point coordinates.

use crate::error::{KernelOp, SensResult, SensitivityError};
use crate::handle::ValidTess;
use crate::params::SensitivityParams;
use crate::tess::rebuild;
use crate::values::{ParamValue, write_param_value};
use sens_kernel::{ParametricModel, Tessellation};
use sens_types::{GlobalIndex, ParamIndex};
use tracing::{debug, info};

/// Coordinates of every global point of a tessellation, laid out like a
/// [`SensitivityVector`](sens_types::SensitivityVector): point `g` occupies
/// `3 * (g - 1)..3 * g`.
///
/// # Errors
///
/// Returns [`SensitivityError::Kernel`] if the tessellation's status or any
/// point cannot be read.
///
/// # Example
///
/// ```
/// use sens_engine::tess_coordinates;
/// use sens_kernel::{MemoryBody, MemoryTess};
/// use sens_types::Point3;
///
/// let tess = MemoryTess::new(
///     MemoryBody::wire(),
///     vec![Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0)],
/// );
/// assert_eq!(tess_coordinates(&tess).unwrap(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// ```
pub fn tess_coordinates<T: Tessellation>(tess: &T) -> SensResult<Vec<f64>> {
    let topology = |source| SensitivityError::kernel(KernelOp::TessTopology, source);
    let count = tess.status().map_err(topology)?.point_count;

    let last = u32::try_from(count).unwrap_or(u32::MAX);

    let mut xyz = Vec::with_capacity(3 * count);
    for global in (1..=last).filter_map(GlobalIndex::new) {
        let p = tess.global_point(global).map_err(topology)?;
        xyz.extend_from_slice(&[p.x, p.y, p.z]);
    }
    Ok(xyz)
}

/// Surface points of the model at new design values.
///
/// Every `(parameter, value)` pair is written, the model is rebuilt, and
/// `tess` is transferred onto the body now in slot `body_index` (1-based).
/// The coordinates of the transferred tessellation are returned in the
/// layout of [`tess_coordinates`].
///
/// `tess` keeps describing the body it was made for, so the same initial
/// tessellation can be passed on every call.
///
/// # Errors
///
/// - Validation errors from [`ValidTess::new`]
/// - [`SensitivityError::ValueShape`] or [`SensitivityError::Kernel`] if a
///   value cannot be written; pairs before it stay written
/// - [`SensitivityError::BodyNotInModel`] if slot `body_index` holds no
///   active body after the rebuild
/// - [`SensitivityError::Kernel`] if the rebuild or the transfer fails
///
/// # Example
///
/// ```
/// use sens_engine::{surface_coordinates, ParamValue, SensitivityParams};
/// use sens_kernel::{MemoryBody, MemoryModel, MemoryTess};
/// use sens_types::{BodyKind, ParamShape, Point3, Vector3};
///
/// let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
/// let body = MemoryBody::wire().with_geometry(points.clone());
/// let tess = MemoryTess::new(body.clone(), points).with_edge([1, 2]);
///
/// let mut model = MemoryModel::new();
/// let len = model.add_design_parameter("len", ParamShape::scalar(), &[1.0]);
/// let slot = model.add_body(BodyKind::Wire, body);
/// model.set_derivative(len, 1, 1, slot, vec![Vector3::zeros(), Vector3::x()]);
///
/// let xyz = surface_coordinates(
///     &mut model,
///     Some(&tess),
///     slot,
///     &[(len, ParamValue::Scalar(3.0))],
///     &SensitivityParams::default(),
/// )
/// .unwrap();
/// assert_eq!(xyz, [0.0, 0.0, 0.0, 3.0, 0.0, 0.0]);
/// ```
pub fn surface_coordinates<M, T>(
    model: &mut M,
    tess: Option<&T>,
    body_index: usize,
    values: &[(ParamIndex, ParamValue)],
    params: &SensitivityParams,
) -> SensResult<Vec<f64>>
where
    M: ParametricModel,
    T: Tessellation<Body = M::Body>,
{
    let tess = ValidTess::new(tess)?;

    info!(values = values.len(), body_index, "building surface");
    for (index, value) in values {
        write_param_value(model, *index, value)?;
    }
    rebuild(model, params)?;

    let body = body_index
        .checked_sub(1)
        .and_then(|i| model.bodies().get(i))
        .filter(|slot| slot.is_active())
        .and_then(|slot| slot.body.as_ref())
        .ok_or(SensitivityError::BodyNotInModel)?;
    let mapped = tess
        .tess()
        .map_to_body(body)
        .map_err(|source| SensitivityError::kernel(KernelOp::TessTopology, source))?;

    let xyz = tess_coordinates(&mapped)?;
    debug!(points = xyz.len() / 3, body_index, "surface mapped");
    Ok(xyz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use sens_kernel::{KernelCall, MemoryBody, MemoryModel, MemoryTess};
    use sens_types::{BodyKind, ParamShape, Point3, Vector3};

    struct BoxModel {
        model: MemoryModel,
        tess: MemoryTess,
        slot: usize,
        sizes: [ParamIndex; 3],
    }

    /// Unit box whose corners scale with the `dx`, `dy`, `dz` parameters.
    fn unit_box() -> BoxModel {
        let corners = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let body = MemoryBody::solid(6).with_geometry(corners.clone());
        let tess = MemoryTess::new(body.clone(), corners.clone())
            .with_face([1, 2, 3, 4])
            .with_face([6, 7, 8, 5])
            .with_face([1, 6, 5, 4])
            .with_face([2, 3, 8, 7])
            .with_face([1, 6, 7, 2])
            .with_face([4, 5, 8, 3]);

        let mut model = MemoryModel::new();
        let sizes = ["dx", "dy", "dz"]
            .map(|name| model.add_design_parameter(name, ParamShape::scalar(), &[1.0]));
        let slot = model.add_body(BodyKind::Solid, body);
        for (axis, size) in sizes.iter().enumerate() {
            let field = corners
                .iter()
                .map(|p| {
                    let mut d = Vector3::zeros();
                    d[axis] = p[axis];
                    d
                })
                .collect();
            model.set_derivative(*size, 1, 1, slot, field);
        }
        BoxModel {
            model,
            tess,
            slot,
            sizes,
        }
    }

    fn resize(b: &mut BoxModel, dims: [f64; 3]) -> SensResult<Vec<f64>> {
        let values: Vec<_> = b
            .sizes
            .iter()
            .zip(dims)
            .map(|(index, v)| (*index, ParamValue::Scalar(v)))
            .collect();
        surface_coordinates(
            &mut b.model,
            Some(&b.tess),
            b.slot,
            &values,
            &SensitivityParams::default(),
        )
    }

    #[test]
    fn test_empty_tessellation() {
        let tess = MemoryTess::new(MemoryBody::wire(), Vec::new());
        assert!(tess_coordinates(&tess).unwrap().is_empty());
    }

    #[test]
    fn test_status_failure() {
        let tess = MemoryTess::new(MemoryBody::wire(), vec![Point3::origin()])
            .with_status_failure(-2);
        let err = tess_coordinates(&tess).unwrap_err();
        assert_eq!(err.kernel_op(), Some(KernelOp::TessTopology));
    }

    #[test]
    fn test_box_resized() {
        let mut b = unit_box();
        let xyz = resize(&mut b, [2.0, 0.5, 3.0]).unwrap();
        let expected = [
            0.0, 0.0, 0.0,
            0.0, 0.5, 0.0,
            0.0, 0.5, 3.0,
            0.0, 0.0, 3.0,
            2.0, 0.0, 3.0,
            2.0, 0.0, 0.0,
            2.0, 0.5, 0.0,
            2.0, 0.5, 3.0,
        ];
        assert_eq!(xyz.len(), expected.len());
        for (x, e) in xyz.iter().zip(expected) {
            assert_relative_eq!(*x, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_initial_tessellation_reused() {
        let mut b = unit_box();
        resize(&mut b, [2.0, 0.5, 3.0]).unwrap();
        let xyz = resize(&mut b, [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(xyz, tess_coordinates(&b.tess).unwrap());
    }

    #[test]
    fn test_missing_slot() {
        let mut b = unit_box();
        b.slot = 2;
        let err = resize(&mut b, [2.0, 2.0, 2.0]).unwrap_err();
        assert!(matches!(err, SensitivityError::BodyNotInModel));
    }

    #[test]
    fn test_bad_value_skips_build() {
        let mut b = unit_box();
        let values = [(b.sizes[0], ParamValue::Vector(DVector::from_vec(vec![1.0, 2.0])))];
        let err = surface_coordinates(
            &mut b.model,
            Some(&b.tess),
            b.slot,
            &values,
            &SensitivityParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SensitivityError::ValueShape { .. }));
        assert!(!b
            .model
            .calls()
            .iter()
            .any(|call| matches!(call, KernelCall::Build(_))));
    }
}
