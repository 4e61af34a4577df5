//! In-memory error lists.

use crate::{ErrorList, ErrorRecord, KernelError, KernelResult};
use sens_types::Severity;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// An error list held in memory.
///
/// Entries can be made unreadable to exercise reporting of fetch failures.
/// A release probe observes when the list is dropped.
///
/// # Example
///
/// ```
/// use sens_kernel::{ErrorList, MemoryErrorList};
/// use sens_types::Severity;
///
/// let list = MemoryErrorList::new().with_record(Severity::Warning, None, ["check input"]);
/// let released = list.release_probe();
/// assert_eq!(list.len(), 1);
/// drop(list);
/// assert!(released.load(std::sync::atomic::Ordering::SeqCst));
/// ```
#[derive(Debug, Default)]
pub struct MemoryErrorList {
    records: Vec<Option<ErrorRecord>>,
    released: Arc<AtomicBool>,
}

impl MemoryErrorList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    #[must_use]
    pub fn with_record<I, S>(mut self, severity: Severity, object: Option<&str>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records.push(Some(ErrorRecord {
            severity,
            object: object.map(str::to_owned),
            lines: lines.into_iter().map(Into::into).collect(),
        }));
        self
    }

    /// Append a record whose fetch fails.
    #[must_use]
    pub fn with_unreadable_record(mut self) -> Self {
        self.records.push(None);
        self
    }

    /// Flag that becomes `true` once the list is released.
    #[must_use]
    pub fn release_probe(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl ErrorList for MemoryErrorList {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn record(&self, index: usize) -> KernelResult<ErrorRecord> {
        let entry = index
            .checked_sub(1)
            .and_then(|i| self.records.get(i))
            .ok_or(KernelError::OutOfRange {
                what: "error record",
                index: i64::try_from(index).unwrap_or(i64::MAX),
                count: self.records.len(),
            })?;
        entry.clone().ok_or(KernelError::Status {
            call: "error_info",
            code: -302,
        })
    }
}

impl Drop for MemoryErrorList {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}
