//! In-memory parametric models.

use crate::{
    BuildDepth, BuildReport, KernelError, KernelResult, MemoryBody, MemoryTess,
    ModelBody, OutLevelControl, ParametricModel, SharedOutLevel, Tessellation,
};
use hashbrown::{HashMap, HashSet};
use nalgebra::{Point3, Vector3};
use sens_types::{BodyKind, EntityRef, ParamIndex, ParamInfo, ParamKind, ParamShape};
use std::cell::RefCell;

/// Value reported by [`MemoryModel::dtime`] after a build in which some
/// nonzero velocity belonged to a finite-difference parameter.
pub const FINITE_DIFFERENCE_DTIME: f64 = 1e-3;

/// A call made into a [`MemoryModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum KernelCall {
    /// `param_count`
    ParamCount,
    /// `param_info`
    ParamInfo(ParamIndex),
    /// `param_value`
    ParamValue {
        /// Parameter.
        index: ParamIndex,
        /// Row.
        row: u32,
        /// Column.
        col: u32,
    },
    /// `set_param_value`
    SetParamValue {
        /// Parameter.
        index: ParamIndex,
        /// Row.
        row: u32,
        /// Column.
        col: u32,
        /// New value.
        value: f64,
    },
    /// `reset_velocities`
    ResetVelocities,
    /// `set_velocity`
    SetVelocity {
        /// Parameter.
        index: ParamIndex,
        /// Row.
        row: u32,
        /// Column.
        col: u32,
        /// New velocity.
        value: f64,
    },
    /// `set_dtime`
    SetDtime(f64),
    /// `build`
    Build(BuildDepth),
    /// `tess_velocity`
    TessVelocity {
        /// 1-based body slot.
        body_index: usize,
        /// Entity queried.
        entity: EntityRef,
    },
}

/// Discriminant of a [`KernelCall`], used for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelCallKind {
    /// `param_count`
    ParamCount,
    /// `param_info`
    ParamInfo,
    /// `param_value`
    ParamValue,
    /// `set_param_value`
    SetParamValue,
    /// `reset_velocities`
    ResetVelocities,
    /// `set_velocity`
    SetVelocity,
    /// `set_dtime`
    SetDtime,
    /// `build`
    Build,
    /// `tess_velocity`
    TessVelocity,
}

impl KernelCall {
    /// The call's discriminant.
    #[must_use]
    pub const fn kind(&self) -> KernelCallKind {
        match self {
            Self::ParamCount => KernelCallKind::ParamCount,
            Self::ParamInfo(_) => KernelCallKind::ParamInfo,
            Self::ParamValue { .. } => KernelCallKind::ParamValue,
            Self::SetParamValue { .. } => KernelCallKind::SetParamValue,
            Self::ResetVelocities => KernelCallKind::ResetVelocities,
            Self::SetVelocity { .. } => KernelCallKind::SetVelocity,
            Self::SetDtime(_) => KernelCallKind::SetDtime,
            Self::Build(_) => KernelCallKind::Build,
            Self::TessVelocity { .. } => KernelCallKind::TessVelocity,
        }
    }

    const fn entry_point(kind: KernelCallKind) -> &'static str {
        match kind {
            KernelCallKind::ParamCount => "info",
            KernelCallKind::ParamInfo => "get_pmtr",
            KernelCallKind::ParamValue => "get_valu",
            KernelCallKind::SetParamValue => "set_valu",
            KernelCallKind::ResetVelocities | KernelCallKind::SetVelocity => "set_vel",
            KernelCallKind::SetDtime => "set_dtime",
            KernelCallKind::Build => "build",
            KernelCallKind::TessVelocity => "get_tess_vel",
        }
    }
}

/// Slot of a parameter table entry: parameter index and row-major offset.
type Slot = (ParamIndex, usize);

#[derive(Debug, Clone)]
struct MemoryParam {
    info: ParamInfo,
    values: Vec<f64>,
    nominal: Vec<f64>,
    velocities: Vec<f64>,
}

/// A parametric model held entirely in memory.
///
/// Bodies carry an attached tessellation that defines the points at which
/// velocities are evaluated. Each design parameter entry may register a
/// per-global-point derivative for a body, and optionally per-entity
/// derivatives that take precedence for one edge or face.
///
/// # Example
///
/// ```
/// use sens_kernel::{BuildDepth, MemoryBody, MemoryModel, MemoryTess, ParametricModel};
/// use sens_types::{BodyKind, EntityRef, ParamShape, Point3, Vector3};
///
/// let body = MemoryBody::solid(1).with_geometry(vec![Point3::origin()]);
/// let tess = MemoryTess::new(body.clone(), vec![Point3::origin()]).with_face([1]);
///
/// let mut model = MemoryModel::new();
/// let dx = model.add_design_parameter("dx", ParamShape::scalar(), &[1.0]);
/// let slot = model.add_body(BodyKind::Solid, body);
/// model.attach_tessellation(slot, tess);
/// model.set_derivative(dx, 1, 1, slot, vec![Vector3::x()]);
///
/// model.set_velocity(dx, 1, 1, 2.0).unwrap();
/// model.build(BuildDepth::All).unwrap();
///
/// let vel = model.tess_velocity(slot, EntityRef::Face(1)).unwrap();
/// assert_eq!(vel, vec![Vector3::new(2.0, 0.0, 0.0)]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryModel {
    params: Vec<MemoryParam>,
    bodies: Vec<ModelBody<MemoryBody>>,
    base_geometry: Vec<Option<Vec<Point3<f64>>>>,
    tessellations: Vec<Option<MemoryTess>>,
    derivatives: HashMap<(Slot, usize), Vec<Vector3<f64>>>,
    entity_derivatives: HashMap<(Slot, usize, EntityRef), Vec<Vector3<f64>>>,
    finite_difference: HashSet<ParamIndex>,
    velocity_fields: HashMap<(usize, EntityRef), Vec<Vector3<f64>>>,
    dtime: f64,
    out_level: SharedOutLevel,
    build_out_level: Option<i32>,
    built_values: Option<Vec<Vec<f64>>>,
    calls: RefCell<Vec<KernelCall>>,
    failures: HashSet<KernelCallKind>,
    broken_params: HashSet<ParamIndex>,
}

impl MemoryModel {
    /// An empty model with its own verbosity setting at level 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_out_level(SharedOutLevel::new(1))
    }

    /// An empty model sharing the given verbosity setting.
    #[must_use]
    pub fn with_out_level(out_level: SharedOutLevel) -> Self {
        Self {
            out_level,
            ..Self::default()
        }
    }

    /// Append a parameter table entry with row-major `values`.
    ///
    /// Missing values are zero; extra values are ignored.
    pub fn add_parameter(&mut self, info: ParamInfo, values: &[f64]) -> ParamIndex {
        let mut stored = vec![0.0; info.shape.len()];
        for (s, v) in stored.iter_mut().zip(values) {
            *s = *v;
        }
        self.params.push(MemoryParam {
            velocities: vec![0.0; stored.len()],
            nominal: stored.clone(),
            values: stored,
            info,
        });
        #[allow(clippy::cast_possible_truncation)]
        let index = ParamIndex::new(self.params.len() as u32);
        index.unwrap_or_else(|| unreachable!("table length is at least one after push"))
    }

    /// Append a design parameter.
    pub fn add_design_parameter(
        &mut self,
        name: &str,
        shape: ParamShape,
        values: &[f64],
    ) -> ParamIndex {
        self.add_parameter(ParamInfo::design(name, shape), values)
    }

    /// Append a body slot, returning its 1-based index.
    pub fn add_body(&mut self, kind: BodyKind, body: MemoryBody) -> usize {
        self.push_slot(ModelBody::active(kind, body))
    }

    /// Append an arbitrary body slot, returning its 1-based index.
    pub fn push_slot(&mut self, slot: ModelBody<MemoryBody>) -> usize {
        self.base_geometry.push(
            slot.body
                .as_ref()
                .and_then(MemoryBody::geometry)
                .map(<[_]>::to_vec),
        );
        self.bodies.push(slot);
        self.tessellations.push(None);
        self.bodies.len()
    }

    /// Attach the tessellation used to evaluate velocities of a body slot.
    ///
    /// Ignored for slots that do not exist.
    pub fn attach_tessellation(&mut self, body_index: usize, tess: MemoryTess) {
        if let Some(slot) = body_index
            .checked_sub(1)
            .and_then(|i| self.tessellations.get_mut(i))
        {
            *slot = Some(tess);
        }
    }

    /// Register the derivative of every global point of a body with respect
    /// to entry `(row, col)` of a parameter.
    ///
    /// Ignored for entries outside the parameter's shape.
    pub fn set_derivative(
        &mut self,
        index: ParamIndex,
        row: u32,
        col: u32,
        body_index: usize,
        per_point: Vec<Vector3<f64>>,
    ) {
        if let Some(slot) = self.slot(index, row, col) {
            self.derivatives.insert((slot, body_index), per_point);
        }
    }

    /// Register the derivative of the local points of one entity, taking
    /// precedence over [`MemoryModel::set_derivative`] for that entity.
    pub fn set_entity_derivative(
        &mut self,
        index: ParamIndex,
        row: u32,
        col: u32,
        body_index: usize,
        entity: EntityRef,
        per_local_point: Vec<Vector3<f64>>,
    ) {
        if let Some(slot) = self.slot(index, row, col) {
            self.entity_derivatives
                .insert((slot, body_index, entity), per_local_point);
        }
    }

    /// Mark a parameter as lacking analytic derivatives.
    pub fn set_finite_difference(&mut self, index: ParamIndex) {
        self.finite_difference.insert(index);
    }

    /// Make every call of the given kind fail.
    pub fn fail_on(&mut self, kind: KernelCallKind) {
        self.failures.insert(kind);
    }

    /// Make `param_info` fail for one parameter.
    pub fn break_parameter(&mut self, index: ParamIndex) {
        self.broken_params.insert(index);
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<KernelCall> {
        self.calls.borrow().clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Current velocity of entry `(row, col)` of a parameter.
    #[must_use]
    pub fn velocity(&self, index: ParamIndex, row: u32, col: u32) -> Option<f64> {
        let (index, offset) = self.slot(index, row, col)?;
        self.param(index).map(|p| p.velocities[offset])
    }

    /// Output level that was in effect during the last build.
    #[must_use]
    pub const fn last_build_out_level(&self) -> Option<i32> {
        self.build_out_level
    }

    /// The tessellation attached to a body slot.
    #[must_use]
    pub fn tessellation(&self, body_index: usize) -> Option<&MemoryTess> {
        body_index
            .checked_sub(1)
            .and_then(|i| self.tessellations.get(i))
            .and_then(Option::as_ref)
    }

    fn param(&self, index: ParamIndex) -> Option<&MemoryParam> {
        self.params.get(index.get() as usize - 1)
    }

    fn slot(&self, index: ParamIndex, row: u32, col: u32) -> Option<Slot> {
        let offset = self.param(index)?.info.shape.flat_offset(row, col)?;
        Some((index, offset))
    }

    fn record(&self, call: KernelCall) -> KernelResult<()> {
        let kind = call.kind();
        self.calls.borrow_mut().push(call);
        if self.failures.contains(&kind) {
            return Err(KernelError::Status {
                call: KernelCall::entry_point(kind),
                code: -999,
            });
        }
        Ok(())
    }

    fn checked_slot(&self, index: ParamIndex, row: u32, col: u32) -> KernelResult<Slot> {
        let param = self.param(index).ok_or(KernelError::OutOfRange {
            what: "parameter",
            index: i64::from(index.get()),
            count: self.params.len(),
        })?;
        let shape = param.info.shape;
        let offset = shape.flat_offset(row, col).ok_or(KernelError::OutOfRange {
            what: "parameter entry",
            index: i64::from(row.max(col)),
            count: shape.len(),
        })?;
        Ok((index, offset))
    }

    fn derivative(
        &self,
        slot: Slot,
        body_index: usize,
        entity: EntityRef,
        local: usize,
        global: usize,
    ) -> Vector3<f64> {
        if let Some(field) = self.entity_derivatives.get(&(slot, body_index, entity)) {
            return field.get(local).copied().unwrap_or_else(Vector3::zeros);
        }
        self.derivatives
            .get(&(slot, body_index))
            .and_then(|field| field.get(global))
            .copied()
            .unwrap_or_else(Vector3::zeros)
    }

    /// Nonzero velocities as `(slot, velocity)` pairs.
    fn active_velocities(&self) -> Vec<(Slot, f64)> {
        self.params
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                #[allow(clippy::cast_possible_truncation)]
                let index = ParamIndex::new(i as u32 + 1)?;
                Some((index, p))
            })
            .flat_map(|(index, p)| {
                p.velocities
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0.0)
                    .map(move |(offset, v)| ((index, offset), *v))
            })
            .collect()
    }

    fn entity_velocity(
        &self,
        active: &[(Slot, f64)],
        body_index: usize,
        tess: &MemoryTess,
        entity: EntityRef,
    ) -> KernelResult<Vec<Vector3<f64>>> {
        let count = tess.point_count(entity)?;
        let mut field = Vec::with_capacity(count);
        for local in 0..count {
            #[allow(clippy::cast_possible_truncation)]
            let global = tess.local_to_global(entity, local as u32 + 1)?;
            let global = global.get() as usize - 1;
            let v = active.iter().fold(Vector3::zeros(), |acc, (slot, vel)| {
                acc + self.derivative(*slot, body_index, entity, local, global) * *vel
            });
            field.push(v);
        }
        Ok(field)
    }

    fn rebuild_geometry(&mut self) {
        let values: Vec<Vec<f64>> = self.params.iter().map(|p| p.values.clone()).collect();
        let nominal: Vec<Vec<f64>> = self.params.iter().map(|p| p.nominal.clone()).collect();
        let previous = self.built_values.replace(values.clone()).unwrap_or(nominal);
        if previous == values {
            return;
        }

        let offsets: Vec<(Slot, f64)> = self
            .params
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                #[allow(clippy::cast_possible_truncation)]
                let index = ParamIndex::new(i as u32 + 1)?;
                Some((index, p))
            })
            .flat_map(|(index, p)| {
                p.values
                    .iter()
                    .zip(&p.nominal)
                    .enumerate()
                    .map(move |(offset, (v, n))| ((index, offset), v - n))
            })
            .filter(|(_, delta)| *delta != 0.0)
            .collect();

        for (i, slot) in self.bodies.iter_mut().enumerate() {
            let body_index = i + 1;
            let Some(body) = slot.body.as_ref() else {
                continue;
            };
            let Some(Some(base)) = self.base_geometry.get(i) else {
                continue;
            };
            let moved: Vec<Point3<f64>> = base
                .iter()
                .enumerate()
                .map(|(g, p)| {
                    offsets.iter().fold(*p, |acc, (s, delta)| {
                        let d = self
                            .derivatives
                            .get(&(*s, body_index))
                            .and_then(|field| field.get(g))
                            .copied()
                            .unwrap_or_else(Vector3::zeros);
                        acc + d * *delta
                    })
                })
                .collect();
            let rebuilt = body.regenerate(moved);
            if let Some(Some(tess)) = self.tessellations.get_mut(i) {
                if let Ok(mapped) = tess.map_to_body(&rebuilt) {
                    *tess = mapped;
                }
            }
            slot.body = Some(rebuilt);
        }
    }
}

impl ParametricModel for MemoryModel {
    type Body = MemoryBody;
    type OutLevel = SharedOutLevel;

    #[allow(clippy::cast_possible_truncation)]
    fn param_count(&self) -> KernelResult<u32> {
        self.record(KernelCall::ParamCount)?;
        Ok(self.params.len() as u32)
    }

    fn param_info(&self, index: ParamIndex) -> KernelResult<ParamInfo> {
        self.record(KernelCall::ParamInfo(index))?;
        if self.broken_params.contains(&index) {
            return Err(KernelError::Status {
                call: "get_pmtr",
                code: -201,
            });
        }
        self.param(index)
            .map(|p| p.info.clone())
            .ok_or(KernelError::OutOfRange {
                what: "parameter",
                index: i64::from(index.get()),
                count: self.params.len(),
            })
    }

    fn param_value(&self, index: ParamIndex, row: u32, col: u32) -> KernelResult<f64> {
        self.record(KernelCall::ParamValue { index, row, col })?;
        let (index, offset) = self.checked_slot(index, row, col)?;
        Ok(self.params[index.get() as usize - 1].values[offset])
    }

    fn set_param_value(
        &mut self,
        index: ParamIndex,
        row: u32,
        col: u32,
        value: f64,
    ) -> KernelResult<()> {
        self.record(KernelCall::SetParamValue {
            index,
            row,
            col,
            value,
        })?;
        let (index, offset) = self.checked_slot(index, row, col)?;
        let param = &mut self.params[index.get() as usize - 1];
        if !matches!(
            param.info.kind,
            ParamKind::Design | ParamKind::Configuration
        ) {
            return Err(KernelError::Status {
                call: "set_valu",
                code: -209,
            });
        }
        param.values[offset] = value;
        Ok(())
    }

    fn reset_velocities(&mut self) -> KernelResult<()> {
        self.record(KernelCall::ResetVelocities)?;
        for param in &mut self.params {
            param.velocities.fill(0.0);
        }
        Ok(())
    }

    fn set_velocity(
        &mut self,
        index: ParamIndex,
        row: u32,
        col: u32,
        value: f64,
    ) -> KernelResult<()> {
        self.record(KernelCall::SetVelocity {
            index,
            row,
            col,
            value,
        })?;
        let (index, offset) = self.checked_slot(index, row, col)?;
        let param = &mut self.params[index.get() as usize - 1];
        if !param.info.is_design() {
            return Err(KernelError::Status {
                call: "set_vel",
                code: -209,
            });
        }
        param.velocities[offset] = value;
        Ok(())
    }

    fn set_dtime(&mut self, dtime: f64) -> KernelResult<()> {
        self.record(KernelCall::SetDtime(dtime))?;
        self.dtime = dtime;
        Ok(())
    }

    fn dtime(&self) -> f64 {
        self.dtime
    }

    #[allow(clippy::cast_possible_truncation)]
    fn build(&mut self, depth: BuildDepth) -> KernelResult<BuildReport> {
        self.record(KernelCall::Build(depth))?;
        self.build_out_level = Some(self.out_level.level());
        self.rebuild_geometry();

        let active = self.active_velocities();
        let mut fields = HashMap::new();
        for (i, tess) in self.tessellations.iter().enumerate() {
            let Some(tess) = tess else {
                continue;
            };
            let body_index = i + 1;
            let entities = (1..=tess.edge_count())
                .map(EntityRef::Edge)
                .chain((1..=tess.face_count()).map(EntityRef::Face));
            for entity in entities {
                let field = self.entity_velocity(&active, body_index, tess, entity)?;
                fields.insert((body_index, entity), field);
            }
        }
        self.velocity_fields = fields;

        if active
            .iter()
            .any(|((index, _), _)| self.finite_difference.contains(index))
        {
            self.dtime = FINITE_DIFFERENCE_DTIME;
        }

        let branches = self.params.len() as u32;
        Ok(BuildReport {
            built_to: match depth {
                BuildDepth::All => branches,
                BuildDepth::UpTo(branch) => branch.min(branches),
            },
            body_count: self.bodies.len(),
        })
    }

    fn bodies(&self) -> &[ModelBody<MemoryBody>] {
        &self.bodies
    }

    fn tess_velocity(
        &self,
        body_index: usize,
        entity: EntityRef,
    ) -> KernelResult<Vec<Vector3<f64>>> {
        self.record(KernelCall::TessVelocity { body_index, entity })?;
        if body_index == 0 || body_index > self.bodies.len() {
            return Err(KernelError::OutOfRange {
                what: "body",
                index: body_index as i64,
                count: self.bodies.len(),
            });
        }
        self.velocity_fields
            .get(&(body_index, entity))
            .cloned()
            .ok_or(KernelError::Missing {
                what: "tessellation velocity",
            })
    }

    fn out_level(&self) -> SharedOutLevel {
        self.out_level.clone()
    }
}
