//! Core value types for tessellation design sensitivities.
//!
//! This crate provides the foundational types shared by the sensitivity
//! crates:
//!
//! - [`EntityRef`] - An edge or face of a tessellated body
//! - [`ParamIndex`], [`ParamShape`], [`ParamInfo`] - Entries of a model's parameter table
//! - [`ParamLookup`] - Result of resolving a design parameter by name
//! - [`GlobalIndex`] - Tessellation-wide point index
//! - [`SensitivityVector`] - Flat per-vertex derivative output
//! - [`Severity`], [`BodyKind`], [`ObjectClass`] - Kernel classifications
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero Bevy dependencies.
//!
//! # Indexing
//!
//! Every index in this crate is **1-based**, matching the numbering used by
//! parametric modeling kernels. Conversions to 0-based storage offsets are
//! explicit ([`GlobalIndex::offset`], [`ParamShape::flat_offset`]).
//!
//! # Example
//!
//! ```
//! use sens_types::{EntityRef, GlobalIndex, SensitivityVector, Vector3};
//!
//! let mut dsen = SensitivityVector::zeros(4);
//! let g = GlobalIndex::new(2).unwrap();
//! dsen.set(g, Vector3::new(0.0, 1.0, 0.0));
//!
//! assert_eq!(dsen.len(), 12);
//! assert_eq!(dsen.as_slice()[3..6], [0.0, 1.0, 0.0]);
//! assert_eq!(EntityRef::Edge(3).signed_id(), -3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod class;
mod entity;
mod param;
mod point;
mod vector;

pub use class::{BodyKind, ObjectClass, Severity};
pub use entity::{EntityKind, EntityRef};
pub use param::{DesignParameter, ParamIndex, ParamInfo, ParamKind, ParamLookup, ParamShape};
pub use point::GlobalIndex;
pub use vector::{FlatLengthError, SensitivityVector};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
