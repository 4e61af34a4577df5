//! Sensitivity computation parameters.
//!
//! This module provides the [`SensitivityParams`] struct for configuring
//! which parameter entry is perturbed and how the rebuild and scatter
//! behave.

use sens_kernel::BuildDepth;

/// How to combine velocities written to the same global point by more than
/// one edge or face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharedPointPolicy {
    /// Later entities overwrite earlier ones, in entity iteration order.
    #[default]
    Overwrite,
    /// The mean of all velocities written to the point.
    Average,
}

/// Parameters for a sensitivity computation.
///
/// # Examples
///
/// ```
/// use sens_engine::{SensitivityParams, SharedPointPolicy};
///
/// // Default: entry (1, 1), quiet full rebuild, overwrite at shared points
/// let params = SensitivityParams::default();
/// assert_eq!((params.row, params.col), (1, 1));
///
/// // Entry (2, 3) of a matrix parameter, averaging shared points
/// let params = SensitivityParams::entry(2, 3)
///     .with_shared_points(SharedPointPolicy::Average);
/// assert_eq!(params.col, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitivityParams {
    /// 1-based row of the perturbed parameter entry.
    pub row: u32,
    /// 1-based column of the perturbed parameter entry.
    pub col: u32,
    /// How far the model is rebuilt.
    pub build_depth: BuildDepth,
    /// Silence kernel output while rebuilding.
    pub quiet_build: bool,
    /// Handling of points shared between entities.
    pub shared_points: SharedPointPolicy,
}

impl Default for SensitivityParams {
    fn default() -> Self {
        Self::entry(1, 1)
    }
}

impl SensitivityParams {
    /// Parameters for entry `(row, col)` with default settings.
    #[must_use]
    pub const fn entry(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            build_depth: BuildDepth::All,
            quiet_build: true,
            shared_points: SharedPointPolicy::Overwrite,
        }
    }

    /// Set the rebuild depth.
    #[must_use]
    pub const fn with_build_depth(mut self, depth: BuildDepth) -> Self {
        self.build_depth = depth;
        self
    }

    /// Set whether kernel output is silenced during the rebuild.
    #[must_use]
    pub const fn with_quiet_build(mut self, quiet: bool) -> Self {
        self.quiet_build = quiet;
        self
    }

    /// Set the shared point policy.
    #[must_use]
    pub const fn with_shared_points(mut self, policy: SharedPointPolicy) -> Self {
        self.shared_points = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SensitivityParams::default();
        assert_eq!(params.row, 1);
        assert_eq!(params.col, 1);
        assert_eq!(params.build_depth, BuildDepth::All);
        assert!(params.quiet_build);
        assert_eq!(params.shared_points, SharedPointPolicy::Overwrite);
    }

    #[test]
    fn test_builder_chain() {
        let params = SensitivityParams::entry(2, 1)
            .with_build_depth(BuildDepth::UpTo(4))
            .with_quiet_build(false)
            .with_shared_points(SharedPointPolicy::Average);
        assert_eq!(params.row, 2);
        assert_eq!(params.build_depth, BuildDepth::UpTo(4));
        assert!(!params.quiet_build);
        assert_eq!(params.shared_points, SharedPointPolicy::Average);
    }
}
