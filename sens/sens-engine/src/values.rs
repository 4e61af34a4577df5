//! Whole-parameter value access.

use crate::error::{KernelOp, SensResult, SensitivityError};
use nalgebra::{DMatrix, DVector};
use sens_kernel::{KernelError, ParametricModel};
use sens_types::{ParamIndex, ParamInfo, ParamShape};

/// The value of a whole parameter.
///
/// Shapes with one entry read as [`ParamValue::Scalar`], shapes with one
/// row or one column as [`ParamValue::Vector`], anything else as
/// [`ParamValue::Matrix`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A 1x1 parameter.
    Scalar(f64),
    /// A single row or single column.
    Vector(DVector<f64>),
    /// A general matrix.
    Matrix(DMatrix<f64>),
}

impl ParamValue {
    /// Whether this value can be stored in a parameter of `shape`.
    ///
    /// A vector fits either a single row or a single column of its length.
    #[must_use]
    pub fn fits(&self, shape: ParamShape) -> bool {
        match self {
            Self::Scalar(_) => shape.rows == 1 && shape.cols == 1,
            Self::Vector(v) => {
                (shape.rows == 1 || shape.cols == 1) && v.len() == shape.len()
            }
            Self::Matrix(m) => {
                m.nrows() == shape.rows as usize && m.ncols() == shape.cols as usize
            }
        }
    }

    /// Shape of the value, with vectors reported as columns.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn shape(&self) -> ParamShape {
        match self {
            Self::Scalar(_) => ParamShape::scalar(),
            Self::Vector(v) => ParamShape::new(v.len() as u32, 1),
            Self::Matrix(m) => ParamShape::new(m.nrows() as u32, m.ncols() as u32),
        }
    }

    /// Entries in row-major order.
    fn row_major(&self) -> Vec<f64> {
        match self {
            Self::Scalar(x) => vec![*x],
            Self::Vector(v) => v.iter().copied().collect(),
            Self::Matrix(m) => m.transpose().iter().copied().collect(),
        }
    }
}

fn value_error(source: KernelError) -> SensitivityError {
    SensitivityError::kernel(KernelOp::ParamValue, source)
}

fn describe<M>(model: &M, index: ParamIndex) -> SensResult<ParamInfo>
where
    M: ParametricModel + ?Sized,
{
    model.param_info(index).map_err(value_error)
}

/// Every `(row, col)` entry of a shape in row-major order.
fn entries(shape: ParamShape) -> impl Iterator<Item = (u32, u32)> {
    (1..=shape.rows).flat_map(move |row| (1..=shape.cols).map(move |col| (row, col)))
}

/// Read every entry of a parameter.
///
/// # Errors
///
/// Returns [`SensitivityError::Kernel`] if the parameter or any entry
/// cannot be read.
///
/// # Example
///
/// ```
/// use sens_engine::{read_param_value, ParamValue};
/// use sens_kernel::MemoryModel;
/// use sens_types::ParamShape;
///
/// let mut model = MemoryModel::new();
/// let r = model.add_design_parameter("r", ParamShape::scalar(), &[0.25]);
/// assert_eq!(read_param_value(&model, r).unwrap(), ParamValue::Scalar(0.25));
/// ```
pub fn read_param_value<M>(model: &M, index: ParamIndex) -> SensResult<ParamValue>
where
    M: ParametricModel + ?Sized,
{
    let shape = describe(model, index)?.shape;
    let values = entries(shape)
        .map(|(row, col)| model.param_value(index, row, col).map_err(value_error))
        .collect::<SensResult<Vec<f64>>>()?;

    Ok(if shape.rows == 1 && shape.cols == 1 {
        ParamValue::Scalar(values[0])
    } else if shape.rows == 1 || shape.cols == 1 {
        ParamValue::Vector(DVector::from_vec(values))
    } else {
        ParamValue::Matrix(DMatrix::from_row_slice(
            shape.rows as usize,
            shape.cols as usize,
            &values,
        ))
    })
}

/// Write every entry of a parameter.
///
/// # Errors
///
/// - [`SensitivityError::ValueShape`] if `value` does not fit the
///   parameter, before anything is written
/// - [`SensitivityError::Kernel`] if the parameter cannot be described or
///   an entry cannot be written
pub fn write_param_value<M>(model: &mut M, index: ParamIndex, value: &ParamValue) -> SensResult<()>
where
    M: ParametricModel + ?Sized,
{
    let info = describe(model, index)?;
    if !value.fits(info.shape) {
        return Err(SensitivityError::ValueShape {
            name: info.name,
            expected: info.shape,
            found: value.shape(),
        });
    }

    for ((row, col), x) in entries(info.shape).zip(value.row_major()) {
        model.set_param_value(index, row, col, x).map_err(value_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sens_kernel::{KernelCall, KernelCallKind, MemoryModel};
    use sens_types::{ParamInfo, ParamKind};

    #[test]
    fn test_read_shapes() {
        let mut model = MemoryModel::new();
        let row = model.add_design_parameter("row", ParamShape::new(1, 3), &[1.0, 2.0, 3.0]);
        let col = model.add_design_parameter("col", ParamShape::new(2, 1), &[4.0, 5.0]);
        let mat = model.add_design_parameter(
            "mat",
            ParamShape::new(2, 3),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        );

        assert_eq!(
            read_param_value(&model, row).unwrap(),
            ParamValue::Vector(DVector::from_vec(vec![1.0, 2.0, 3.0]))
        );
        assert_eq!(
            read_param_value(&model, col).unwrap(),
            ParamValue::Vector(DVector::from_vec(vec![4.0, 5.0]))
        );
        let ParamValue::Matrix(m) = read_param_value(&model, mat).unwrap() else {
            panic!("expected a matrix");
        };
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
    }

    #[test]
    fn test_write_matrix_is_row_major() {
        let mut model = MemoryModel::new();
        let mat = model.add_design_parameter("mat", ParamShape::new(2, 2), &[0.0; 4]);
        let value = ParamValue::Matrix(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        write_param_value(&mut model, mat, &value).unwrap();

        assert_eq!(model.param_value(mat, 1, 2).unwrap(), 2.0);
        assert_eq!(model.param_value(mat, 2, 1).unwrap(), 3.0);
        assert_eq!(read_param_value(&model, mat).unwrap(), value);
    }

    #[test]
    fn test_vector_fits_row_or_column() {
        let v = ParamValue::Vector(DVector::from_vec(vec![1.0, 2.0]));
        assert!(v.fits(ParamShape::new(1, 2)));
        assert!(v.fits(ParamShape::new(2, 1)));
        assert!(!v.fits(ParamShape::new(1, 3)));
        assert!(!ParamValue::Scalar(1.0).fits(ParamShape::new(1, 2)));
    }

    #[test]
    fn test_shape_mismatch_writes_nothing() {
        let mut model = MemoryModel::new();
        let p = model.add_design_parameter("p", ParamShape::new(1, 2), &[0.0, 0.0]);
        model.clear_calls();

        let err = write_param_value(&mut model, p, &ParamValue::Scalar(1.0)).unwrap_err();
        assert!(matches!(
            err,
            SensitivityError::ValueShape { ref name, .. } if name == "p"
        ));
        assert!(
            !model
                .calls()
                .iter()
                .any(|c| matches!(c, KernelCall::SetParamValue { .. }))
        );
    }

    #[test]
    fn test_kernel_rejection_is_reported() {
        let mut model = MemoryModel::new();
        let out = model.add_parameter(
            ParamInfo::new(ParamKind::Output, "@volume", ParamShape::scalar()),
            &[1.0],
        );
        let err = write_param_value(&mut model, out, &ParamValue::Scalar(2.0)).unwrap_err();
        assert_eq!(err.kernel_op(), Some(KernelOp::ParamValue));

        model.fail_on(KernelCallKind::ParamValue);
        assert!(read_param_value(&model, out).is_err());
    }
}
