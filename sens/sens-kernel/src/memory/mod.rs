//! In-memory reference kernel.
//!
//! A small, fully deterministic implementation of every kernel contract.
//! Geometry is linear in the design parameters: each parameter entry
//! carries a per-point derivative, velocities are the velocity-weighted sum
//! of those derivatives, and rebuilt coordinates are the base coordinates
//! plus the value-weighted sum. Every model call is recorded, and any call
//! kind can be made to fail, which makes the kernel suitable for testing
//! code that drives a real modeling engine.

mod body;
mod errors;
mod model;
mod out_level;
mod tess;

pub use body::MemoryBody;
pub use errors::MemoryErrorList;
pub use model::{FINITE_DIFFERENCE_DTIME, KernelCall, KernelCallKind, MemoryModel};
pub use out_level::SharedOutLevel;
pub use tess::MemoryTess;
