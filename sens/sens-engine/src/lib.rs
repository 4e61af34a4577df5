//! Tessellation sensitivities with respect to design parameters.
//!
//! Given a parametric model and a tessellation of one of its bodies, this
//! crate computes how every tessellation point moves when one entry of one
//! design parameter changes at unit rate:
//!
//! - [`find_design_parameter`] / [`design_parameters`] - name lookup with
//!   1-based `(row, col)` validation
//! - [`tess_sensitivity`] - drive the kernel's velocity rebuild and scatter
//!   per-entity velocities into a [`SensitivityVector`](sens_types::SensitivityVector)
//! - [`finite_difference_sensitivity`] - perturb-and-rebuild estimate for
//!   checking analytic velocities
//! - [`read_param_value`] / [`write_param_value`] - whole-parameter values
//! - [`tess_coordinates`] - point coordinates in the same layout
//! - [`surface_coordinates`] - surface points at new design values, the
//!   map whose derivatives the sensitivities are
//! - [`report_errors`] - print kernel error lists
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Quick Start
//!
//! ```
//! use sens_engine::{tess_sensitivity, SensitivityParams};
//! use sens_kernel::{MemoryBody, MemoryModel, MemoryTess};
//! use sens_types::{BodyKind, ParamShape, Point3, Vector3};
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let body = MemoryBody::sheet(1).with_geometry(points.clone());
//! let tess = MemoryTess::new(body.clone(), points).with_face([1, 2, 3]);
//!
//! let mut model = MemoryModel::new();
//! let height = model.add_design_parameter("height", ParamShape::scalar(), &[2.0]);
//! let slot = model.add_body(BodyKind::Sheet, body);
//! model.attach_tessellation(slot, tess.clone());
//! model.set_derivative(height, 1, 1, slot, vec![Vector3::z(); 3]);
//!
//! let dsen = tess_sensitivity(&mut model, "height", Some(&tess), &SensitivityParams::default())
//!     .unwrap();
//! assert_eq!(dsen.point_count(), 3);
//! assert!(dsen.points().all(|v| v == Vector3::z()));
//! ```
//!
//! # Shared Points
//!
//! A global point on the boundary between two faces (or the joint between
//! two edges) receives a velocity from each. [`SharedPointPolicy::Overwrite`]
//! keeps the last one written in entity order; [`SharedPointPolicy::Average`]
//! keeps their mean.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod coords;
mod error;
mod finite_diff;
mod handle;
mod out_level;
mod params;
mod report;
mod resolve;
mod tess;
mod values;

pub use coords::{surface_coordinates, tess_coordinates};
pub use error::{Axis, KernelOp, SensResult, SensitivityError};
pub use finite_diff::finite_difference_sensitivity;
pub use handle::ValidTess;
pub use out_level::OutLevelGuard;
pub use params::{SensitivityParams, SharedPointPolicy};
pub use report::{report_errors, report_errors_to};
pub use resolve::{design_parameters, find_design_parameter};
pub use tess::tess_sensitivity;
pub use values::{ParamValue, read_param_value, write_param_value};
