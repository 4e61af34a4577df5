//! Contracts for the modeling and meshing kernel.
//!
//! These traits describe the calls the sensitivity code makes into a
//! parametric modeling kernel. They are implemented by kernel bindings and
//! by the in-memory [`MemoryModel`](crate::MemoryModel) family.

use crate::KernelResult;
use nalgebra::{Point3, Vector3};
use sens_types::{BodyKind, EntityRef, GlobalIndex, ObjectClass, ParamIndex, ParamInfo, Severity};

/// Handle to any kernel object carrying a validity marker and a class tag.
pub trait KernelObject {
    /// Whether the object's validity marker is intact.
    fn is_valid(&self) -> bool;

    /// The object's class tag.
    fn object_class(&self) -> ObjectClass;
}

/// A topological body.
///
/// Equality is handle identity: two values compare equal only when they
/// refer to the same kernel body.
pub trait BodyTopology: KernelObject + PartialEq {
    /// Number of faces of the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel cannot query the body's topology.
    fn face_count(&self) -> KernelResult<u32>;
}

/// Result of a tessellation status query.
#[derive(Debug, Clone, Copy)]
pub struct TessStatus<'a, B> {
    /// The body this tessellation discretizes, if any.
    pub body: Option<&'a B>,
    /// Whether the tessellation is complete.
    pub complete: bool,
    /// Number of global points.
    pub point_count: usize,
}

/// A discretization of a body into edge polylines and face triangulations.
///
/// Points are numbered locally per entity (`1..=point_count(entity)`) and
/// globally across the whole tessellation (`1..=point_count`).
pub trait Tessellation: KernelObject {
    /// Body handle type.
    type Body: BodyTopology;

    /// Query the tessellated body and global point count.
    ///
    /// # Errors
    ///
    /// Returns an error if the tessellation is not attached to a body.
    fn status(&self) -> KernelResult<TessStatus<'_, Self::Body>>;

    /// Number of tessellated edges.
    fn edge_count(&self) -> u32;

    /// Number of tessellated faces.
    fn face_count(&self) -> u32;

    /// Number of points discretizing `entity`.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` does not exist.
    fn point_count(&self, entity: EntityRef) -> KernelResult<usize>;

    /// Map a 1-based local point index on `entity` to its global index.
    ///
    /// # Errors
    ///
    /// Returns an error if `entity` or `local` is out of range.
    fn local_to_global(&self, entity: EntityRef, local: u32) -> KernelResult<GlobalIndex>;

    /// Coordinates of a global point.
    ///
    /// # Errors
    ///
    /// Returns an error if `global` is out of range.
    fn global_point(&self, global: GlobalIndex) -> KernelResult<Point3<f64>>;

    /// Transfer this tessellation onto a topologically identical body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot carry this tessellation.
    fn map_to_body(&self, body: &Self::Body) -> KernelResult<Self>
    where
        Self: Sized;
}

/// How far a rebuild should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildDepth {
    /// Rebuild the complete feature tree.
    #[default]
    All,
    /// Rebuild up to and including the given branch.
    UpTo(u32),
}

/// Outcome of a successful rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Last branch that was built.
    pub built_to: u32,
    /// Number of bodies in the model after the build.
    pub body_count: usize,
}

/// One slot of a model's body table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBody<B> {
    /// Whether the body is still on the build stack.
    pub on_stack: bool,
    /// Body type; [`BodyKind::Null`] marks an inactive slot.
    pub kind: BodyKind,
    /// Topological body handle.
    pub body: Option<B>,
}

impl<B> ModelBody<B> {
    /// An on-stack body of the given kind.
    #[must_use]
    pub const fn active(kind: BodyKind, body: B) -> Self {
        Self {
            on_stack: true,
            kind,
            body: Some(body),
        }
    }

    /// An inactive slot.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            on_stack: false,
            kind: BodyKind::Null,
            body: None,
        }
    }

    /// Whether this slot can be matched against a tessellation body.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.on_stack && !self.kind.is_null()
    }
}

/// Process-wide kernel verbosity setting.
///
/// Kernels keep a single output level shared by every model. Handles are
/// cheap and may be held independently of the model they came from.
pub trait OutLevelControl {
    /// Current output level.
    fn level(&self) -> i32;

    /// Set the output level, returning the previous one.
    fn set_level(&self, level: i32) -> i32;
}

/// A parametric feature model.
///
/// Parameter tables and body tables are 1-based.
pub trait ParametricModel {
    /// Body handle type.
    type Body: BodyTopology;
    /// Verbosity handle type.
    type OutLevel: OutLevelControl;

    /// Number of entries in the parameter table.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be queried.
    fn param_count(&self) -> KernelResult<u32>;

    /// Table entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the query fails.
    fn param_info(&self, index: ParamIndex) -> KernelResult<ParamInfo>;

    /// Current value of entry `(row, col)` of a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    fn param_value(&self, index: ParamIndex, row: u32, col: u32) -> KernelResult<f64>;

    /// Set the value of entry `(row, col)` of a parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or is not settable.
    fn set_param_value(&mut self, index: ParamIndex, row: u32, col: u32, value: f64)
    -> KernelResult<()>;

    /// Zero the velocity of every parameter entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel rejects the reset.
    fn reset_velocities(&mut self) -> KernelResult<()>;

    /// Set the velocity of entry `(row, col)` of a design parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or is not a design
    /// parameter.
    fn set_velocity(&mut self, index: ParamIndex, row: u32, col: u32, value: f64)
    -> KernelResult<()>;

    /// Set the finite-difference perturbation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel rejects the value.
    fn set_dtime(&mut self, dtime: f64) -> KernelResult<()>;

    /// Finite-difference perturbation time used by the last build; nonzero
    /// when some velocity had to be obtained by finite differences.
    fn dtime(&self) -> f64;

    /// Rebuild the feature tree, propagating velocities.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails.
    fn build(&mut self, depth: BuildDepth) -> KernelResult<BuildReport>;

    /// The body table.
    fn bodies(&self) -> &[ModelBody<Self::Body>];

    /// Per-point velocity of `entity` on the 1-based body `body_index`, in
    /// local point order.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or entity does not exist or velocities
    /// have not been built.
    fn tess_velocity(&self, body_index: usize, entity: EntityRef)
    -> KernelResult<Vec<Vector3<f64>>>;

    /// Handle to the kernel's verbosity setting.
    fn out_level(&self) -> Self::OutLevel;
}

/// One record of a kernel error list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Severity class.
    pub severity: Severity,
    /// Description of the kernel object the record refers to.
    pub object: Option<String>,
    /// Message body, one entry per line.
    pub lines: Vec<String>,
}

/// A list of error records returned by a kernel call.
///
/// The list owns kernel memory that is released when the value is dropped.
pub trait ErrorList {
    /// Number of records.
    fn len(&self) -> usize;

    /// Whether the list is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record at the 1-based `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be fetched.
    fn record(&self, index: usize) -> KernelResult<ErrorRecord>;
}
