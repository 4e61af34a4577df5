//! Scoped kernel verbosity.

use sens_kernel::OutLevelControl;

/// Sets the kernel output level for the guard's lifetime.
///
/// The previous level is restored when the guard is dropped, including
/// during error propagation.
///
/// # Example
///
/// ```
/// use sens_engine::OutLevelGuard;
/// use sens_kernel::{OutLevelControl, SharedOutLevel};
///
/// let level = SharedOutLevel::new(2);
/// {
///     let _quiet = OutLevelGuard::new(level.clone(), 0);
///     assert_eq!(level.level(), 0);
/// }
/// assert_eq!(level.level(), 2);
/// ```
#[derive(Debug)]
#[must_use = "the previous level is restored when the guard is dropped"]
pub struct OutLevelGuard<C: OutLevelControl> {
    control: C,
    previous: i32,
}

impl<C: OutLevelControl> OutLevelGuard<C> {
    /// Switch to `level`, remembering the current one.
    pub fn new(control: C, level: i32) -> Self {
        let previous = control.set_level(level);
        Self { control, previous }
    }

    /// The level that will be restored.
    #[must_use]
    pub const fn previous(&self) -> i32 {
        self.previous
    }
}

impl<C: OutLevelControl> Drop for OutLevelGuard<C> {
    fn drop(&mut self) {
        self.control.set_level(self.previous);
    }
}
