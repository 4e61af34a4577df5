//! Modeling and meshing kernel contracts.
//!
//! Sensitivity computation drives an external parametric modeling kernel
//! and its meshing subsystem. This crate describes the calls made into that
//! kernel as traits:
//!
//! - [`ParametricModel`] - parameter table, velocities, rebuilds, body table
//! - [`Tessellation`] - per-entity discretizations and local/global point numbering
//! - [`BodyTopology`] / [`KernelObject`] - handle validity, classification, identity
//! - [`OutLevelControl`] - the kernel's process-wide verbosity
//! - [`ErrorList`] - error records returned by kernel calls
//!
//! It also ships an in-memory reference kernel ([`MemoryModel`],
//! [`MemoryTess`], [`MemoryBody`], [`MemoryErrorList`]) that implements every
//! contract deterministically, records calls, and supports failure
//! injection.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Example
//!
//! ```
//! use sens_kernel::{MemoryBody, MemoryModel, MemoryTess, ParametricModel, Tessellation};
//! use sens_types::{BodyKind, ParamShape, Point3};
//!
//! let body = MemoryBody::wire();
//! let tess = MemoryTess::new(body.clone(), vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)])
//!     .with_edge([1, 2]);
//!
//! let mut model = MemoryModel::new();
//! model.add_design_parameter("len", ParamShape::scalar(), &[1.0]);
//! let slot = model.add_body(BodyKind::Wire, body);
//! model.attach_tessellation(slot, tess);
//!
//! assert_eq!(model.param_count().unwrap(), 1);
//! assert_eq!(model.bodies().len(), 1);
//! assert_eq!(model.tessellation(slot).unwrap().edge_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod memory;
mod traits;

pub use error::{KernelError, KernelResult};
pub use memory::{
    FINITE_DIFFERENCE_DTIME, KernelCall, KernelCallKind, MemoryBody, MemoryErrorList, MemoryModel,
    MemoryTess, SharedOutLevel,
};
pub use traits::{
    BodyTopology, BuildDepth, BuildReport, ErrorList, ErrorRecord, KernelObject, ModelBody,
    OutLevelControl, ParametricModel, TessStatus, Tessellation,
};
