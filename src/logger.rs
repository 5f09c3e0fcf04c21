use crate::error::{REDACTED, VisitError, is_secret};
use crate::field::Record;
use crate::leaf::Slot;
use crate::visit::{Inspector, inspect};

/// Inspector that emits one `KEY: value` info event per leaf
///
/// Values under keys containing "password" (any case) are replaced with
/// `<redacted>` and never formatted.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Inspector for Logger {
    fn inspect(&mut self, key: &str, slot: &dyn Slot) -> Result<(), VisitError> {
        if is_secret(key) {
            tracing::info!("{}: {}", key, REDACTED);
        } else {
            tracing::info!("{}: {}", key, slot.render());
        }
        Ok(())
    }
}

/// Log every resolved value of `record` under `prefix`
///
/// Typically called once at startup, after [`crate::load`].
pub fn log_with_prefix<R: Record>(record: &R, prefix: &str) {
    // Logger never fails, so there is nothing to report
    let _ = inspect(record, prefix, &mut Logger);
}
