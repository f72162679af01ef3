//! Action selection for entries that passed the filter.
//!
//! Precedence is first-match-wins:
//! 1. `list` set: list only, even if delete or archive were also requested
//! 2. archive destination set: archive, then delete if `delete` is set
//! 3. `delete` set: delete
//! 4. nothing requested: list

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, SweepError};

/// Action flags chosen for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionFlags {
    pub list: bool,
    pub delete: bool,
    pub archive: Option<PathBuf>,
}

/// The single action applied to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    List,
    Delete,
    Archive {
        dest_dir: &'a Path,
        then_delete: bool,
    },
}

impl ActionFlags {
    /// Resolve the flags into the action every selected entry receives.
    pub fn select(&self) -> Action<'_> {
        if self.list {
            return Action::List;
        }
        if let Some(dest_dir) = self.archive.as_deref() {
            return Action::Archive {
                dest_dir,
                then_delete: self.delete,
            };
        }
        if self.delete {
            return Action::Delete;
        }
        Action::List
    }
}

/// Write `path` and a newline to `out`.
pub fn list_file<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    writeln!(out, "{}", path.display()).map_err(|source| SweepError::sink("output", source))
}
