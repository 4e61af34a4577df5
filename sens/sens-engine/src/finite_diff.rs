//! Finite-difference sensitivity.
//!
//! Used to check analytic velocities: the parameter entry is perturbed by
//! a step, the model rebuilt, the tessellation transferred onto the rebuilt
//! body, and point displacements divided by the step.

use crate::error::{KernelOp, SensResult, SensitivityError};
use crate::handle::ValidTess;
use crate::params::SensitivityParams;
use crate::tess::{rebuild, resolve_index};
use sens_kernel::{KernelError, ParametricModel, Tessellation};
use sens_types::{GlobalIndex, SensitivityVector};
use tracing::{debug, warn};

/// Estimate the sensitivity of a tessellation by a one-sided finite
/// difference: `(x(p + step) - x(p)) / step` for every global point.
///
/// The parameter value is restored and the model rebuilt before returning,
/// whether or not the estimate succeeded. The tessellation's body is
/// replaced by the rebuild, so `tess` no longer belongs to the model
/// afterwards.
///
/// # Errors
///
/// - [`SensitivityError::InvalidStep`] if `step` is zero or not finite
/// - The validation and lookup errors of
///   [`tess_sensitivity`](crate::tess_sensitivity)
/// - [`SensitivityError::Kernel`] for any failing kernel call, including
///   transferring the tessellation onto the rebuilt body
///
/// # Example
///
/// ```
/// use sens_engine::{finite_difference_sensitivity, SensitivityParams};
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
/// let fd = finite_difference_sensitivity(
///     &mut model, "len", Some(&tess), 1e-3, &SensitivityParams::default(),
/// )
/// .unwrap();
/// assert!((fd.as_slice()[3] - 1.0).abs() < 1e-9);
/// ```
pub fn finite_difference_sensitivity<M, T>(
    model: &mut M,
    name: &str,
    tess: Option<&T>,
    step: f64,
    params: &SensitivityParams,
) -> SensResult<SensitivityVector>
where
    M: ParametricModel,
    T: Tessellation<Body = M::Body>,
{
    if !step.is_finite() || step == 0.0 {
        return Err(SensitivityError::InvalidStep(step));
    }

    let tess = ValidTess::new(tess)?;
    let body_index = tess.find_in_model(model)?;
    let index = resolve_index(model, name, params)?;

    let value_error = |source| SensitivityError::kernel(KernelOp::ParamValue, source);
    let original = model
        .param_value(index, params.row, params.col)
        .map_err(value_error)?;
    model
        .set_param_value(index, params.row, params.col, original + step)
        .map_err(value_error)?;

    let estimate = displacement_rate(model, &tess, body_index, step, params);

    let restored = model
        .set_param_value(index, params.row, params.col, original)
        .map_err(value_error)
        .and_then(|()| rebuild(model, params));
    if let Err(err) = &restored {
        warn!(param = name, error = %err, "failed to restore parameter after perturbation");
    }

    let dsen = estimate?;
    restored?;
    debug!(param = name, step, max_norm = dsen.max_norm(), "finite difference computed");
    Ok(dsen)
}

/// Rebuild at the perturbed value and difference the transferred points
/// against the originals.
fn displacement_rate<M, T>(
    model: &mut M,
    tess: &ValidTess<'_, T>,
    body_index: usize,
    step: f64,
    params: &SensitivityParams,
) -> SensResult<SensitivityVector>
where
    M: ParametricModel,
    T: Tessellation<Body = M::Body>,
{
    let topology = |source| SensitivityError::kernel(KernelOp::TessTopology, source);

    rebuild(model, params)?;
    let body = model
        .bodies()
        .get(body_index - 1)
        .and_then(|slot| slot.body.as_ref())
        .ok_or(SensitivityError::BodyNotInModel)?;
    let moved = tess.tess().map_to_body(body).map_err(topology)?;

    let point_count = tess.point_count();
    let mut dsen = SensitivityVector::zeros(point_count);
    let last = u32::try_from(point_count).unwrap_or(u32::MAX);
    for global in (1..=last).filter_map(GlobalIndex::new) {
        let before = tess.tess().global_point(global).map_err(topology)?;
        let after = moved.global_point(global).map_err(topology)?;
        if !dsen.set(global, (after - before) / step) {
            return Err(topology(KernelError::OutOfRange {
                what: "global point",
                index: i64::from(global.get()),
                count: point_count,
            }));
        }
    }
    Ok(dsen)
}
