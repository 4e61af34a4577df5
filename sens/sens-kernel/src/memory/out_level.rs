//! Shared verbosity setting.

use crate::OutLevelControl;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// Output level shared by every model built from the same handle.
///
/// # Example
///
/// ```
/// use sens_kernel::{OutLevelControl, SharedOutLevel};
///
/// let level = SharedOutLevel::new(1);
/// let other = level.clone();
/// assert_eq!(other.set_level(0), 1);
/// assert_eq!(level.level(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedOutLevel(Arc<AtomicI32>);

impl SharedOutLevel {
    /// Create a new setting with the given initial level.
    #[must_use]
    pub fn new(level: i32) -> Self {
        Self(Arc::new(AtomicI32::new(level)))
    }
}

impl OutLevelControl for SharedOutLevel {
    fn level(&self) -> i32 {
        self.0.load(Ordering::SeqCst)
    }

    fn set_level(&self, level: i32) -> i32 {
        self.0.swap(level, Ordering::SeqCst)
    }
}
