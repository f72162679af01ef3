//! Sequential tree sweep: walk, filter, dispatch, act.
//!
//! Entries are visited in file-name order and each one is fully handled
//! before the next is read. The first error from the walk, an action, or a
//! sink ends the sweep; entries after it are left untouched.

#![allow(missing_docs)]

use std::io::Write;
use std::path::{Component, Path};

use serde::Serialize;
use walkdir::WalkDir;

use crate::core::errors::{Result, SweepError};
use crate::logger::delete_log::DeleteLog;
use crate::scanner::archive::archive_file;
use crate::scanner::deletion::delete_file;
use crate::scanner::dispatch::{Action, ActionFlags, list_file};
use crate::scanner::filter::{EntryFilter, EntryInfo};

/// Filters plus actions for one sweep. Immutable while the sweep runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepConfig {
    pub filter: EntryFilter,
    pub actions: ActionFlags,
}

/// Counters gathered over a completed sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub visited: u64,
    pub skipped: u64,
    pub listed: u64,
    pub deleted: u64,
    pub archived: u64,
    pub bytes_archived: u64,
}

/// Applies a [`SweepConfig`] to every entry below a root.
#[derive(Debug, Clone)]
pub struct Sweeper {
    config: SweepConfig,
}

impl Sweeper {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Walk `root` and handle every entry the filter keeps.
    ///
    /// Listed paths go to `out`; each removed file gets one record in
    /// `delete_log`. A leading `./` is dropped from listed and logged paths.
    /// Symlinks are not followed: a link is filtered and acted on as the link
    /// itself.
    pub fn run<W: Write, L: Write>(
        &self,
        root: &Path,
        out: &mut W,
        delete_log: &mut DeleteLog<L>,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();
        let action = self.config.actions.select();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            report.visited += 1;

            let info = EntryInfo::from(&entry.metadata()?);
            let path = trim_cur_dir(entry.path());
            if self.config.filter.should_skip(path, info) {
                report.skipped += 1;
                continue;
            }

            match action {
                Action::List => {
                    list_file(path, out)?;
                    report.listed += 1;
                }
                Action::Archive {
                    dest_dir,
                    then_delete,
                } => {
                    let archived = archive_file(dest_dir, root, entry.path())?;
                    report.archived += 1;
                    report.bytes_archived += archived.bytes_in;
                    if then_delete {
                        delete_file(path, delete_log)?;
                        report.deleted += 1;
                    }
                }
                Action::Delete => {
                    delete_file(path, delete_log)?;
                    report.deleted += 1;
                }
            }
        }

        out.flush()
            .map_err(|source| SweepError::sink("output", source))?;
        Ok(report)
    }
}

/// `./a/b.log` becomes `a/b.log`; the root `.` itself is left alone.
fn trim_cur_dir(path: &Path) -> &Path {
    let mut components = path.components();
    match components.next() {
        Some(Component::CurDir) if components.clone().next().is_some() => components.as_path(),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn list_config(extensions: &[&str], min_size: u64) -> SweepConfig {
        SweepConfig {
            filter: EntryFilter {
                extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
                min_size,
                min_name_length: 0,
            },
            actions: ActionFlags {
                list: true,
                ..ActionFlags::default()
            },
        }
    }

    // root/
    //   dir.log        (18 bytes)
    //   dir2/
    //     script.sh    (14 bytes)
    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dir.log"), b"log line number 1\n").unwrap();
        fs::create_dir(tmp.path().join("dir2")).unwrap();
        fs::write(tmp.path().join("dir2").join("script.sh"), b"#!/bin/sh\nexit").unwrap();
        tmp
    }

    fn sweep(root: &Path, config: SweepConfig) -> (Result<RunReport>, String, String) {
        let mut out = Vec::new();
        let mut log = DeleteLog::new(Vec::new());
        let result = Sweeper::new(config).run(root, &mut out, &mut log);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(log.into_inner()).unwrap(),
        )
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn lists_files_in_walk_order() {
        let tree = sample_tree();
        let (result, out, _) = sweep(tree.path(), list_config(&[], 0));
        let report = result.unwrap();

        let root = tree.path().display();
        assert_eq!(out, format!("{root}/dir.log\n{root}/dir2/script.sh\n"));
        assert_eq!(report.visited, 4);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.listed, 2);
    }

    #[test]
    fn extension_filter_narrows_listing() {
        let tree = sample_tree();
        let (_, out, _) = sweep(tree.path(), list_config(&[".log"], 0));
        assert_eq!(out, format!("{}/dir.log\n", tree.path().display()));

        let (_, out, _) = sweep(tree.path(), list_config(&[".gz"], 0));
        assert!(out.is_empty());
    }

    #[test]
    fn size_filter_is_inclusive() {
        let tree = sample_tree();
        let (_, out, _) = sweep(tree.path(), list_config(&[".log"], 18));
        assert_eq!(out, format!("{}/dir.log\n", tree.path().display()));

        let (_, out, _) = sweep(tree.path(), list_config(&[".log"], 19));
        assert!(out.is_empty());
    }

    #[test]
    fn listing_twice_is_identical() {
        let tree = sample_tree();
        let (_, first, _) = sweep(tree.path(), list_config(&[], 0));
        let (_, second, _) = sweep(tree.path(), list_config(&[], 0));
        assert_eq!(first, second);
    }

    #[test]
    fn no_action_defaults_to_list() {
        let tree = sample_tree();
        let (_, out, log) = sweep(tree.path(), SweepConfig::default());
        assert_eq!(out.lines().count(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn list_wins_over_delete_and_archive() {
        let tree = sample_tree();
        let dest = TempDir::new().unwrap();
        let config = SweepConfig {
            filter: EntryFilter::default(),
            actions: ActionFlags {
                list: true,
                delete: true,
                archive: Some(dest.path().to_path_buf()),
            },
        };
        let (result, out, log) = sweep(tree.path(), config);
        result.unwrap();

        assert_eq!(out.lines().count(), 2);
        assert!(log.is_empty());
        assert!(tree.path().join("dir.log").exists());
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn delete_removes_only_matching_files() {
        let tmp = TempDir::new().unwrap();
        for i in 1..=4 {
            fs::write(tmp.path().join(format!("file{i}.log")), b"dummy").unwrap();
        }
        for i in 1..=3 {
            fs::write(tmp.path().join(format!("file{i}.gz")), b"dummy").unwrap();
        }
        let config = SweepConfig {
            filter: EntryFilter {
                extensions: vec![".log".to_string()],
                ..EntryFilter::default()
            },
            actions: ActionFlags {
                delete: true,
                ..ActionFlags::default()
            },
        };

        let (result, out, log) = sweep(tmp.path(), config);
        let report = result.unwrap();

        assert!(out.is_empty());
        assert_eq!(report.deleted, 4);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 3);
        let lines: Vec<&str> = log.split('\n').collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[..4].iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn archive_keeps_sources_and_mirrors_tree() {
        let tree = sample_tree();
        let dest = TempDir::new().unwrap();
        let config = SweepConfig {
            filter: EntryFilter::default(),
            actions: ActionFlags {
                archive: Some(dest.path().to_path_buf()),
                ..ActionFlags::default()
            },
        };

        let (result, out, log) = sweep(tree.path(), config);
        let report = result.unwrap();

        assert!(out.is_empty(), "archive mode does not list");
        assert!(log.is_empty());
        assert_eq!(report.archived, 2);
        assert_eq!(report.bytes_archived, 18 + 14);
        assert!(dest.path().join("dir.log.gz").is_file());
        assert!(dest.path().join("dir2").join("script.sh.gz").is_file());
        assert!(tree.path().join("dir.log").exists());
        assert!(tree.path().join("dir2").join("script.sh").exists());
    }

    #[test]
    fn archive_then_delete() {
        let tree = sample_tree();
        let dest = TempDir::new().unwrap();
        let config = SweepConfig {
            filter: EntryFilter {
                extensions: vec![".sh".to_string()],
                ..EntryFilter::default()
            },
            actions: ActionFlags {
                list: false,
                delete: true,
                archive: Some(dest.path().to_path_buf()),
            },
        };

        let (result, _, log) = sweep(tree.path(), config);
        let report = result.unwrap();

        assert_eq!((report.archived, report.deleted), (1, 1));
        assert!(dest.path().join("dir2").join("script.sh.gz").is_file());
        assert!(!tree.path().join("dir2").join("script.sh").exists());
        assert!(tree.path().join("dir.log").exists());
        assert_eq!(log.lines().count(), 1);
    }

    #[test]
    fn archive_to_regular_file_fails_before_touching_anything() {
        let tree = sample_tree();
        let holder = TempDir::new().unwrap();
        let not_a_dir = holder.path().join("archive.txt");
        fs::write(&not_a_dir, b"").unwrap();
        let config = SweepConfig {
            filter: EntryFilter::default(),
            actions: ActionFlags {
                list: false,
                delete: true,
                archive: Some(not_a_dir),
            },
        };

        let (result, _, log) = sweep(tree.path(), config);

        let err = result.unwrap_err();
        assert!(matches!(err, SweepError::NotADirectory { .. }), "{err}");
        assert!(log.is_empty());
        assert!(tree.path().join("dir.log").exists());
        assert!(tree.path().join("dir2").join("script.sh").exists());
    }

    #[test]
    fn missing_root_is_a_traversal_error() {
        let tmp = TempDir::new().unwrap();
        let (result, out, _) = sweep(&tmp.path().join("missing"), list_config(&[], 0));
        assert_eq!(result.unwrap_err().code(), "FSW-3002");
        assert!(out.is_empty());
    }

    #[test]
    fn root_that_is_a_file_is_its_own_entry() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only.txt");
        fs::write(&file, b"abc").unwrap();

        let (result, out, _) = sweep(&file, list_config(&[], 0));
        assert_eq!(result.unwrap().visited, 1);
        assert_eq!(out, format!("{}\n", file.display()));
    }

    #[test]
    fn output_failure_stops_the_sweep() {
        let tree = sample_tree();
        let mut log = DeleteLog::new(Vec::new());
        let err = Sweeper::new(list_config(&[], 0))
            .run(tree.path(), &mut ClosedPipe, &mut log)
            .unwrap_err();
        assert!(matches!(err, SweepError::Sink { sink: "output", .. }), "{err}");
    }

    #[test]
    fn leading_cur_dir_is_trimmed() {
        assert_eq!(trim_cur_dir(Path::new("./dir.log")), Path::new("dir.log"));
        assert_eq!(
            trim_cur_dir(Path::new("./data/dir2/a.sh")),
            Path::new("data/dir2/a.sh")
        );
        assert_eq!(trim_cur_dir(Path::new(".")), Path::new("."));
        assert_eq!(trim_cur_dir(Path::new("data/a.log")), Path::new("data/a.log"));
        assert_eq!(trim_cur_dir(Path::new("/tmp/a.log")), Path::new("/tmp/a.log"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_listed_and_deleted_as_the_link() {
        use std::os::unix::fs::symlink;

        let outside = TempDir::new().unwrap();
        let target = outside.path().join("real.log");
        fs::write(&target, b"keep me").unwrap();
        let tree = TempDir::new().unwrap();
        let link = tree.path().join("link.log");
        symlink(&target, &link).unwrap();

        let (result, out, _) = sweep(tree.path(), list_config(&[".log"], 0));
        assert_eq!(result.unwrap().listed, 1);
        assert_eq!(out, format!("{}\n", link.display()));

        let config = SweepConfig {
            filter: EntryFilter {
                extensions: vec![".log".to_string()],
                ..EntryFilter::default()
            },
            actions: ActionFlags {
                delete: true,
                ..ActionFlags::default()
            },
        };
        let (result, _, log) = sweep(tree.path(), config);
        assert_eq!(result.unwrap().deleted, 1);
        assert!(fs::symlink_metadata(&link).is_err(), "link should be gone");
        assert_eq!(fs::read(&target).unwrap(), b"keep me");
        assert!(log.trim_end().ends_with(&link.display().to_string()));
    }

    // Some unix filesystems reject names that are not UTF-8; Linux ones accept them.
    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_name_matches_its_extension() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let odd = tmp.path().join(OsStr::from_bytes(b"caf\xE9.log"));
        fs::write(&odd, b"0123456789").unwrap();
        fs::write(tmp.path().join("plain.txt"), b"0123456789").unwrap();
        let config = SweepConfig {
            filter: EntryFilter {
                extensions: vec![".log".to_string()],
                ..EntryFilter::default()
            },
            actions: ActionFlags {
                delete: true,
                ..ActionFlags::default()
            },
        };

        let (result, _, log) = sweep(tmp.path(), config);
        let report = result.unwrap();

        assert_eq!(report.deleted, 1);
        assert!(!odd.exists());
        assert!(tmp.path().join("plain.txt").exists());
        assert_eq!(log.lines().count(), 1);
    }
}
