//! Tessellation sensitivity.
//!
//! The sensitivity of a tessellation with respect to one design parameter
//! entry is the velocity of every global point when that entry moves at unit
//! rate and every other entry is held fixed. The kernel computes velocities
//! per edge or face during a rebuild; this module drives the rebuild and
//! scatters the per-entity fields into one flat vector indexed by global
//! point.
//!
//! # Algorithm
//!
//! 1. Validate the tessellation and locate its body in the model
//! 2. Resolve the parameter and make it the only moving entry
//! 3. Rebuild with kernel output silenced
//! 4. Scatter edge velocities (wireframe bodies) or face velocities (all
//!    others) to `3 * (g - 1)` for each global point `g`
//!
//! # Example
//!
//! ```
//! use sens_engine::{tess_sensitivity, SensitivityParams};
//! use sens_kernel::{MemoryBody, MemoryModel, MemoryTess};
//! use sens_types::{BodyKind, ParamShape, Point3, Vector3};
//!
//! let points = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
//! let body = MemoryBody::wire().with_geometry(points.clone());
//! let tess = MemoryTess::new(body.clone(), points).with_edge([1, 2]);
//!
//! let mut model = MemoryModel::new();
//! let len = model.add_design_parameter("len", ParamShape::scalar(), &[1.0]);
//! let slot = model.add_body(BodyKind::Wire, body);
//! model.attach_tessellation(slot, tess.clone());
//! model.set_derivative(len, 1, 1, slot, vec![Vector3::zeros(), Vector3::x()]);
//!
//! let dsen = tess_sensitivity(&mut model, "len", Some(&tess), &SensitivityParams::default())
//!     .unwrap();
//! assert_eq!(dsen.as_slice(), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
//! ```

use crate::error::{KernelOp, SensResult, SensitivityError};
use crate::handle::ValidTess;
use crate::out_level::OutLevelGuard;
use crate::params::{SensitivityParams, SharedPointPolicy};
use crate::resolve::find_design_parameter;
use sens_kernel::{KernelError, ParametricModel, Tessellation};
use sens_types::{GlobalIndex, ParamIndex, SensitivityVector};
use tracing::{debug, info};

/// Output level in effect while a quiet rebuild runs.
const QUIET_OUT_LEVEL: i32 = 0;

/// Velocity of every tessellation point with respect to one design
/// parameter entry.
///
/// The result has `3 * N` components for a tessellation with `N` global
/// points; point `g` occupies `3 * (g - 1)..3 * g`. Points touched by no
/// entity stay zero.
///
/// Velocities of every other parameter are cleared and the model is
/// rebuilt, so the model's velocity state after a successful call describes
/// this entry alone.
///
/// # Errors
///
/// - Validation errors from [`ValidTess::new`]
/// - [`SensitivityError::BodyNotInModel`] if the tessellation's body is not
///   an active body of `model`
/// - Lookup errors from [`find_design_parameter`], and
///   [`SensitivityError::NoSensitivity`] if no design parameter is called
///   `name`; velocities are untouched in both cases
/// - [`SensitivityError::Kernel`] for any failing kernel call
pub fn tess_sensitivity<M, T>(
    model: &mut M,
    name: &str,
    tess: Option<&T>,
    params: &SensitivityParams,
) -> SensResult<SensitivityVector>
where
    M: ParametricModel,
    T: Tessellation<Body = M::Body>,
{
    let tess = ValidTess::new(tess)?;
    let body_index = tess.find_in_model(model)?;

    let index = resolve_index(model, name, params)?;
    info!(param = name, row = params.row, col = params.col, "building sensitivity");
    move_only(model, index, params)?;
    rebuild(model, params)?;

    if model.dtime() != 0.0 {
        info!(
            param = name,
            row = params.row,
            col = params.col,
            dtime = model.dtime(),
            "finite difference used for sensitivity"
        );
    }

    scatter(model, &tess, body_index, params.shared_points)
}

/// Resolve `name` to a parameter index, failing on the no-sensitivity
/// sentinel.
pub(crate) fn resolve_index<M>(
    model: &M,
    name: &str,
    params: &SensitivityParams,
) -> SensResult<ParamIndex>
where
    M: ParametricModel + ?Sized,
{
    find_design_parameter(model, name, params.row, params.col)?
        .index()
        .ok_or_else(|| SensitivityError::NoSensitivity {
            name: name.to_owned(),
        })
}

/// Make entry `(row, col)` of `index` the only nonzero velocity.
fn move_only<M>(model: &mut M, index: ParamIndex, params: &SensitivityParams) -> SensResult<()>
where
    M: ParametricModel + ?Sized,
{
    model
        .set_dtime(0.0)
        .map_err(|source| SensitivityError::kernel(KernelOp::SetDtime, source))?;
    model
        .reset_velocities()
        .map_err(|source| SensitivityError::kernel(KernelOp::SetVelocity, source))?;
    model
        .set_velocity(index, params.row, params.col, 1.0)
        .map_err(|source| SensitivityError::kernel(KernelOp::SetVelocity, source))
}

/// Rebuild the model, silencing kernel output if requested.
pub(crate) fn rebuild<M>(model: &mut M, params: &SensitivityParams) -> SensResult<()>
where
    M: ParametricModel + ?Sized,
{
    let _quiet = params
        .quiet_build
        .then(|| OutLevelGuard::new(model.out_level(), QUIET_OUT_LEVEL));

    let report = model
        .build(params.build_depth)
        .map_err(|source| SensitivityError::kernel(KernelOp::Build, source))?;

    debug!(
        built_to = report.built_to,
        bodies = report.body_count,
        "model rebuilt"
    );
    Ok(())
}

fn topology(source: KernelError) -> SensitivityError {
    SensitivityError::kernel(KernelOp::TessTopology, source)
}

/// Gather per-entity velocity fields into one vector indexed by global
/// point.
fn scatter<M, T>(
    model: &M,
    tess: &ValidTess<'_, T>,
    body_index: usize,
    policy: SharedPointPolicy,
) -> SensResult<SensitivityVector>
where
    M: ParametricModel + ?Sized,
    T: Tessellation,
{
    let point_count = tess.point_count();
    let mut dsen = SensitivityVector::zeros(point_count);
    let mut writes = vec![0_u32; point_count];

    for entity in tess.entities() {
        let count = tess.tess().point_count(entity).map_err(topology)?;
        let field = model.tess_velocity(body_index, entity).map_err(topology)?;
        if field.len() < count {
            return Err(topology(KernelError::OutOfRange {
                what: "velocity point",
                index: i64::try_from(count).unwrap_or(i64::MAX),
                count: field.len(),
            }));
        }

        for (local, velocity) in (1..).zip(field.iter().take(count)) {
            let global = tess.tess().local_to_global(entity, local).map_err(topology)?;
            let written = match policy {
                SharedPointPolicy::Overwrite => dsen.set(global, *velocity),
                SharedPointPolicy::Average => dsen.accumulate(global, *velocity),
            };
            if !written {
                return Err(topology(KernelError::OutOfRange {
                    what: "global point",
                    index: i64::from(global.get()),
                    count: point_count,
                }));
            }
            if let Some(n) = writes.get_mut(global.get() as usize - 1) {
                *n += 1;
            }
        }
    }

    let shared = writes.iter().filter(|n| **n > 1).count();
    if policy == SharedPointPolicy::Average {
        for (g, n) in (1..).zip(&writes) {
            if *n > 1 {
                if let Some(global) = GlobalIndex::new(g) {
                    dsen.scale_point(global, 1.0 / f64::from(*n));
                }
            }
        }
    } else if shared > 0 {
        debug!(shared, "shared points overwritten in entity order");
    }

    debug!(
        points = point_count,
        shared,
        wireframe = tess.is_wireframe(),
        max_norm = dsen.max_norm(),
        "scattered sensitivity"
    );
    Ok(dsen)
}
