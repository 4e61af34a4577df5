//! Error types for sensitivity computation.

use sens_kernel::KernelError;
use sens_types::ParamShape;
use thiserror::Error;

/// Result type for sensitivity operations.
pub type SensResult<T> = Result<T, SensitivityError>;

/// A parameter axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row index.
    Row,
    /// Column index.
    Column,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => f.write_str("row"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// The kernel step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum KernelOp {
    /// Querying the parameter table.
    ModelInfo,
    /// Resetting the finite-difference time-step.
    SetDtime,
    /// Clearing or setting a velocity.
    SetVelocity,
    /// Rebuilding the model.
    Build,
    /// Reading tessellation points, numbering, or velocities.
    TessTopology,
    /// Reading or writing a parameter value.
    ParamValue,
}

impl std::fmt::Display for KernelOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ModelInfo => "failed to query model info",
            Self::SetDtime => "failed to set time-step",
            Self::SetVelocity => "failed to set velocity",
            Self::Build => "failed to build",
            Self::TessTopology => "failed to query tessellation topology",
            Self::ParamValue => "failed to access parameter value",
        })
    }
}

/// Errors that can occur while computing sensitivities.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SensitivityError {
    /// The requested row index is below 1.
    #[error("requested row index ({0}) must be at least 1")]
    InvalidRow(u32),

    /// The requested column index is below 1.
    #[error("requested column index ({0}) must be at least 1")]
    InvalidColumn(u32),

    /// The requested entry lies outside the parameter's declared shape.
    #[error(
        "requested {axis} ({requested}) of design parameter '{name}' exceeds the number of {axis}s ({bound})"
    )]
    ShapeMismatch {
        /// Parameter name.
        name: String,
        /// Offending axis.
        axis: Axis,
        /// Requested 1-based index.
        requested: u32,
        /// Declared size along the axis.
        bound: u32,
    },

    /// No design parameter with the requested name exists.
    #[error("no design parameter named '{name}' carries a sensitivity")]
    NoSensitivity {
        /// Requested name.
        name: String,
    },

    /// The tessellation handle is missing or malformed.
    #[error("invalid tessellation: {reason}")]
    InvalidTessellation {
        /// What check failed.
        reason: &'static str,
    },

    /// The body stored in the tessellation is missing or malformed.
    #[error("invalid body stored in tessellation: {reason}")]
    InvalidTessellationBody {
        /// What check failed.
        reason: &'static str,
    },

    /// The tessellation body's topology could not be queried.
    #[error("topology query failed")]
    TopologyQuery(#[source] KernelError),

    /// No active model body is the tessellation's body.
    #[error("no active body in the model matches the tessellation body")]
    BodyNotInModel,

    /// A value does not fit the parameter's shape.
    #[error("value of shape {found} does not fit parameter '{name}' of shape {expected}")]
    ValueShape {
        /// Parameter name.
        name: String,
        /// Declared shape.
        expected: ParamShape,
        /// Shape of the supplied value.
        found: ParamShape,
    },

    /// A finite-difference step is zero or not finite.
    #[error("finite-difference step must be finite and nonzero, got {0}")]
    InvalidStep(f64),

    /// A kernel call returned a non-success status.
    #[error("{op}")]
    Kernel {
        /// Step that failed.
        op: KernelOp,
        /// Kernel error.
        #[source]
        source: KernelError,
    },
}

impl SensitivityError {
    /// Wrap a kernel error with the step that produced it.
    #[must_use]
    pub const fn kernel(op: KernelOp, source: KernelError) -> Self {
        Self::Kernel { op, source }
    }

    /// The failed kernel step, for [`SensitivityError::Kernel`].
    #[must_use]
    pub const fn kernel_op(&self) -> Option<KernelOp> {
        match self {
            Self::Kernel { op, .. } => Some(*op),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_values() {
        assert!(SensitivityError::InvalidRow(0).to_string().contains("(0)"));
        let err = SensitivityError::ShapeMismatch {
            name: "thick".to_owned(),
            axis: Axis::Column,
            requested: 4,
            bound: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("thick"));
        assert!(msg.contains("column (4)"));
        assert!(msg.contains("(3)"));
    }

    #[test]
    fn test_kernel_op_messages() {
        let err = SensitivityError::kernel(
            KernelOp::Build,
            KernelError::Status {
                call: "build",
                code: -1,
            },
        );
        assert_eq!(err.to_string(), "failed to build");
        assert_eq!(err.kernel_op(), Some(KernelOp::Build));
        assert_eq!(SensitivityError::BodyNotInModel.kernel_op(), None);
    }
}
