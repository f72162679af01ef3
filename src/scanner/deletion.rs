//! Delete action: remove one regular file and record it in the delete log.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::core::errors::{Result, SweepError};
use crate::logger::delete_log::DeleteLog;

/// Remove the file at `path`, then write exactly one delete-log record.
///
/// Nothing is logged when removal fails.
pub fn delete_file<L: Write>(path: &Path, log: &mut DeleteLog<L>) -> Result<()> {
    fs::remove_file(path).map_err(|source| SweepError::io(path, source))?;
    log.record_delete(path)
}
