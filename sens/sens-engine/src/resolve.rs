//! Design parameter lookup.
//!
//! Parameters are addressed by name and a 1-based `(row, col)` entry. The
//! parameter table is scanned in declaration order; entries the kernel
//! cannot describe are skipped rather than treated as fatal.

use crate::error::{Axis, KernelOp, SensResult, SensitivityError};
use sens_kernel::ParametricModel;
use sens_types::{DesignParameter, ParamIndex, ParamInfo, ParamLookup, ParamShape};
use tracing::debug;

/// Find the design parameter called `name` and check that entry
/// `(row, col)` lies inside its declared shape.
///
/// Returns [`ParamLookup::NoSensitivity`] when no design parameter has that
/// name. In that case the entry is checked against the shape of the last
/// parameter the scan could read, so an empty table rejects every entry.
///
/// # Errors
///
/// - [`SensitivityError::InvalidRow`] / [`SensitivityError::InvalidColumn`]
///   for indices below 1, before the model is queried
/// - [`SensitivityError::Kernel`] if the parameter count cannot be read
/// - [`SensitivityError::ShapeMismatch`] if the entry is out of bounds
///
/// # Example
///
/// ```
/// use sens_engine::find_design_parameter;
/// use sens_kernel::MemoryModel;
/// use sens_types::{ParamLookup, ParamShape};
///
/// let mut model = MemoryModel::new();
/// let span = model.add_design_parameter("span", ParamShape::new(2, 1), &[1.0, 2.0]);
///
/// let found = find_design_parameter(&model, "span", 2, 1).unwrap();
/// assert_eq!(found, ParamLookup::Index(span));
///
/// let missing = find_design_parameter(&model, "chord", 1, 1).unwrap();
/// assert!(missing.is_no_sensitivity());
///
/// assert!(find_design_parameter(&model, "span", 3, 1).is_err());
/// ```
pub fn find_design_parameter<M>(
    model: &M,
    name: &str,
    row: u32,
    col: u32,
) -> SensResult<ParamLookup>
where
    M: ParametricModel + ?Sized,
{
    if row < 1 {
        return Err(SensitivityError::InvalidRow(row));
    }
    if col < 1 {
        return Err(SensitivityError::InvalidColumn(col));
    }

    let mut examined = ParamShape::new(0, 0);
    let mut lookup = ParamLookup::NoSensitivity;
    for (index, info) in readable_params(model)? {
        examined = info.shape;
        if info.is_design() && info.name == name {
            lookup = ParamLookup::Index(index);
            break;
        }
    }

    if row > examined.rows {
        return Err(shape_mismatch(name, Axis::Row, row, examined.rows));
    }
    if col > examined.cols {
        return Err(shape_mismatch(name, Axis::Column, col, examined.cols));
    }

    debug!(param = name, row, col, ?lookup, "resolved design parameter");
    Ok(lookup)
}

/// List every design parameter in declaration order.
///
/// # Errors
///
/// Returns [`SensitivityError::Kernel`] if the parameter count cannot be
/// read. Individual entries the kernel cannot describe are skipped.
pub fn design_parameters<M>(model: &M) -> SensResult<Vec<DesignParameter>>
where
    M: ParametricModel + ?Sized,
{
    Ok(readable_params(model)?
        .filter(|(_, info)| info.is_design())
        .map(|(index, info)| DesignParameter {
            index,
            name: info.name,
            shape: info.shape,
        })
        .collect())
}

/// Readable parameter table entries in declaration order.
fn readable_params<M>(model: &M) -> SensResult<impl Iterator<Item = (ParamIndex, ParamInfo)> + '_>
where
    M: ParametricModel + ?Sized,
{
    let count = model
        .param_count()
        .map_err(|source| SensitivityError::kernel(KernelOp::ModelInfo, source))?;

    Ok((1..=count).filter_map(ParamIndex::new).filter_map(move |index| {
        match model.param_info(index) {
            Ok(info) => Some((index, info)),
            Err(err) => {
                debug!(index = index.get(), error = %err, "skipping unreadable parameter");
                None
            }
        }
    }))
}

fn shape_mismatch(name: &str, axis: Axis, requested: u32, bound: u32) -> SensitivityError {
    SensitivityError::ShapeMismatch {
        name: name.to_owned(),
        axis,
        requested,
        bound,
    }
}
