//! Kernel error list printing.
//!
//! Each record prints as a severity-tagged first line followed by its
//! continuation lines, indented to align under the first:
//!
//! ```text
//!  Error:   body 2 failed to rebuild
//!           fillet radius too large
//! ```

use sens_kernel::ErrorList;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Width of the `" {tag} "` prefix on a record's first line.
const PREFIX_WIDTH: usize = 10;

/// Print every record of an error list to standard output.
///
/// Does nothing for `None` or an empty list. The list is released when
/// this returns.
pub fn report_errors<L: ErrorList>(errors: Option<L>) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = report_errors_to(&mut out, errors) {
        warn!(error = %err, "failed to write error report");
    }
}

/// Print every record of an error list to `out`, returning the number of
/// records printed.
///
/// A record that cannot be fetched prints a one-line diagnostic instead
/// and does not count as printed. The list is released when this returns.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
///
/// # Example
///
/// ```
/// use sens_engine::report_errors_to;
/// use sens_kernel::MemoryErrorList;
/// use sens_types::Severity;
///
/// let errors = MemoryErrorList::new()
///     .with_record(Severity::Warning, None, ["tolerance exceeded", "on edge 4"]);
///
/// let mut out = Vec::new();
/// let printed = report_errors_to(&mut out, Some(errors)).unwrap();
/// assert_eq!(printed, 1);
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     " Warning: tolerance exceeded\n          on edge 4\n"
/// );
/// ```
pub fn report_errors_to<W, L>(out: &mut W, errors: Option<L>) -> io::Result<usize>
where
    W: Write + ?Sized,
    L: ErrorList,
{
    let Some(errors) = errors else {
        return Ok(0);
    };

    let total = errors.len();
    let mut printed = 0;
    for i in 1..=total {
        let record = match errors.record(i) {
            Ok(record) => record,
            Err(err) => {
                writeln!(out, " report_errors: {i}/{total} error_info = {err}")?;
                continue;
            }
        };

        if let Some(object) = &record.object {
            debug!(index = i, object = %object, "error record object");
        }
        for (j, line) in record.lines.iter().enumerate() {
            if j == 0 {
                write!(out, " {} ", record.severity.tag())?;
            } else {
                write!(out, "{:width$}", "", width = PREFIX_WIDTH)?;
            }
            writeln!(out, "{line}")?;
        }
        printed += 1;
    }
    Ok(printed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sens_kernel::MemoryErrorList;
    use sens_types::Severity;
    use std::sync::atomic::Ordering;

    fn render(errors: Option<MemoryErrorList>) -> (String, usize) {
        let mut out = Vec::new();
        let printed = report_errors_to(&mut out, errors).unwrap();
        (String::from_utf8(out).unwrap(), printed)
    }

    #[test]
    fn test_absent_and_empty_lists_print_nothing() {
        assert_eq!(render(None), (String::new(), 0));
        assert_eq!(render(Some(MemoryErrorList::new())), (String::new(), 0));
    }

    #[test]
    fn test_tags_per_severity() {
        let errors = MemoryErrorList::new()
            .with_record(Severity::Continue, None, ["a"])
            .with_record(Severity::Info, None, ["b"])
            .with_record(Severity::Warning, None, ["c"])
            .with_record(Severity::Error, Some("body 1"), ["d"])
            .with_record(Severity::Status, None, ["e"]);
        let (text, printed) = render(Some(errors));
        assert_eq!(printed, 5);
        assert_eq!(
            text,
            " Cont:    a\n Info:    b\n Warning: c\n Error:   d\n Status:  e\n"
        );
    }

    #[test]
    fn test_unreadable_record_is_skipped() {
        let errors = MemoryErrorList::new()
            .with_unreadable_record()
            .with_record(Severity::Error, None, ["boom"]);
        let (text, printed) = render(Some(errors));
        assert_eq!(printed, 1);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with(" report_errors: 1/2"));
        assert_eq!(lines[1], " Error:   boom");
    }

    #[test]
    fn test_list_is_released() {
        let errors = MemoryErrorList::new().with_record(Severity::Info, None, ["x"]);
        let released = errors.release_probe();
        render(Some(errors));
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_continuation_lines_align() {
        let errors =
            MemoryErrorList::new().with_record(Severity::Error, None, ["first", "second", "third"]);
        let (text, _) = render(Some(errors));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let column = lines[0].find("first").unwrap();
        assert_eq!(lines[1].find("second"), Some(column));
        assert_eq!(lines[2].find("third"), Some(column));
    }
}
