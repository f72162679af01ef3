//! Archive action: gzip a file into a tree mirroring the traversal root.
//!
//! `root/sub/file.log` archived to `dest` becomes `dest/sub/file.log.gz`, a
//! single-member gzip stream whose header carries the name `file.log`.

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::{Compression, GzBuilder};

use crate::core::errors::{Result, SweepError};

/// Suffix appended (never substituted) to archived file names.
pub const ARCHIVE_SUFFIX: &str = ".gz";

/// Outcome of one archived file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedFile {
    pub target: PathBuf,
    pub bytes_in: u64,
}

/// Compress `path` (found while walking `root`) into `dest_dir`.
///
/// The destination is checked on every call; it must already exist and be a
/// directory. Intermediate directories below it are created as needed and an
/// existing target is truncated and rewritten.
pub fn archive_file(dest_dir: &Path, root: &Path, path: &Path) -> Result<ArchivedFile> {
    let target = target_path(dest_dir, root, path)?;

    if let Some(parent) = target.parent() {
        create_dirs(parent)?;
    }

    let bytes_in = write_compressed(&target, path)?;
    Ok(ArchivedFile { target, bytes_in })
}

/// Validate `dest_dir` and compute `dest_dir/<dir of path relative to root>/<name>.gz`.
pub fn target_path(dest_dir: &Path, root: &Path, path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(dest_dir).map_err(|source| SweepError::ArchiveDestination {
        path: dest_dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(SweepError::NotADirectory {
            path: dest_dir.to_path_buf(),
        });
    }

    let rel_dir = relative_dir(root, path)?;
    let file_name = path.file_name().ok_or_else(|| SweepError::OutsideRoot {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    })?;

    let mut name = file_name.to_os_string();
    name.push(ARCHIVE_SUFFIX);
    Ok(dest_dir.join(rel_dir).join(name))
}

/// Directory containing `path`, relative to the traversal `root`.
///
/// A root that names a file is its own entry; it maps to the empty path.
fn relative_dir<'a>(root: &Path, path: &'a Path) -> Result<&'a Path> {
    if path == root {
        return Ok(Path::new(""));
    }
    path.parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .ok_or_else(|| SweepError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}

#[cfg(unix)]
fn create_dirs(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(dir)
        .map_err(|source| SweepError::io(dir, source))
}

#[cfg(not(unix))]
fn create_dirs(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| SweepError::io(dir, source))
}

/// Stream `input` through a gzip encoder into `target`. Returns bytes read.
fn write_compressed(target: &Path, input: &Path) -> Result<u64> {
    let out = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(target)
        .map_err(|source| SweepError::io(target, source))?;

    let src = File::open(input).map_err(|source| SweepError::io(input, source))?;
    let mut reader = BufReader::new(src);

    // Raw name bytes, so non-UTF-8 names survive into the header unchanged.
    let name = input
        .file_name()
        .map(|n| n.as_encoded_bytes().to_vec())
        .unwrap_or_default();
    let mut encoder = GzBuilder::new()
        .filename(name)
        .write(BufWriter::new(out), Compression::default());

    let copied =
        io::copy(&mut reader, &mut encoder).map_err(|source| SweepError::io(input, source))?;

    let mut writer = encoder
        .finish()
        .map_err(|source| SweepError::io(target, source))?;
    writer
        .flush()
        .map_err(|source| SweepError::io(target, source))?;
    let file = writer
        .into_inner()
        .map_err(|err| SweepError::io(target, err.into_error()))?;
    file.sync_all()
        .map_err(|source| SweepError::io(target, source))?;

    Ok(copied)
}
