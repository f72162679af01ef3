//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use filesweep::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, LogFormat};
pub use crate::core::errors::{Result, SweepError};

// Logger
pub use crate::logger::delete_log::DeleteLog;

// Scanner
pub use crate::scanner::archive::{ArchivedFile, archive_file};
pub use crate::scanner::deletion::delete_file;
pub use crate::scanner::dispatch::{Action, ActionFlags, list_file};
pub use crate::scanner::filter::{EntryFilter, EntryInfo, should_skip};
pub use crate::scanner::walker::{RunReport, SweepConfig, Sweeper};
