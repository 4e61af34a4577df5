//! Tessellation design sensitivities for parametric solid models.
//!
//! This umbrella crate re-exports the sens-* crates, providing a unified API
//! for computing how tessellation points move with design parameters. All
//! crates are Layer 0 (zero Bevy dependencies).
//!
//! # Quick Start
//!
//! ```
//! use sens::prelude::*;
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
//!
//! # Module Organization
//!
//! - [`types`] - Value types: `ParamIndex`, `EntityRef`, `GlobalIndex`, `SensitivityVector`
//! - [`kernel`] - Kernel contracts and the in-memory reference kernel
//! - [`engine`] - Parameter lookup, sensitivity computation, error reporting
//!
//! # Feature Flags
//!
//! - `serde` - Serialization of the value types

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Value types: parameter and point indices, entity references, result vectors.
pub use sens_types as types;

/// Kernel contracts and the in-memory reference kernel.
pub use sens_kernel as kernel;

/// Parameter lookup, sensitivity computation, error reporting.
pub use sens_engine as engine;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for sensitivity computation.
///
/// # Usage
///
/// ```
/// use sens::prelude::*;
/// ```
pub mod prelude {
    // Value types
    pub use sens_types::{
        BodyKind, EntityRef, GlobalIndex, ParamIndex, ParamLookup, ParamShape, Point3,
        SensitivityVector, Severity, Vector3,
    };

    // Kernel contracts
    pub use sens_kernel::{ErrorList, OutLevelControl, ParametricModel, Tessellation};

    // In-memory kernel
    pub use sens_kernel::{MemoryBody, MemoryErrorList, MemoryModel, MemoryTess};

    // Engine
    pub use sens_engine::{
        ParamValue, SensitivityError, SensitivityParams, SharedPointPolicy, design_parameters,
        find_design_parameter, finite_difference_sensitivity, report_errors, surface_coordinates,
        tess_sensitivity,
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let model = MemoryModel::new();
        assert_eq!(model.param_count().unwrap(), 0);
        assert_eq!(SensitivityParams::default().row, 1);
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::ParamShape::scalar();
        let _ = kernel::BuildDepth::default();
        let _ = engine::SharedPointPolicy::default();
    }
}
