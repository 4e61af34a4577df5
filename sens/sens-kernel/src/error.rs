//! Error types for kernel calls.

use thiserror::Error;

/// A non-success result from a modeling or meshing kernel call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// The kernel returned a non-success status code.
    #[error("{call} returned status {code}")]
    Status {
        /// Name of the kernel entry point.
        call: &'static str,
        /// Raw status code.
        code: i32,
    },

    /// An index passed to the kernel is outside the valid range.
    #[error("{what} index {index} out of range (count {count})")]
    OutOfRange {
        /// What was being indexed.
        what: &'static str,
        /// The offending index.
        index: i64,
        /// Number of valid entries.
        count: usize,
    },

    /// The requested data has not been produced by the kernel.
    #[error("{what} is not available")]
    Missing {
        /// What was requested.
        what: &'static str,
    },
}

/// Result type for kernel calls.
pub type KernelResult<T> = Result<T, KernelError>;
