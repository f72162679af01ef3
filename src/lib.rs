#![forbid(unsafe_code)]

//! filesweep: walk a directory tree and list, delete, or gzip-archive the
//! files that pass a filter.
//!
//! Every visited entry goes through the same pipeline:
//! 1. **Filter**: directories, undersized files, and files with the wrong
//!    extension or too short a name are skipped
//! 2. **Dispatch**: one action is chosen, first match wins (list, archive
//!    then optional delete, delete, list by default)
//! 3. **Act**: print the path, remove the file and log it, or write a gzip
//!    copy under a mirrored destination tree
//!
//! # Library usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use filesweep::prelude::*;
//!
//! let config = SweepConfig {
//!     filter: EntryFilter {
//!         extensions: vec![".log".to_string()],
//!         ..EntryFilter::default()
//!     },
//!     actions: ActionFlags::default(),
//! };
//! let mut out = std::io::stdout();
//! let mut log = DeleteLog::new(std::io::stderr());
//! let report = Sweeper::new(config).run(Path::new("."), &mut out, &mut log)?;
//! eprintln!("listed {} files", report.listed);
//! # Ok::<(), SweepError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod scanner;
