//! Entry filter: decides which visited entries are left alone.

use std::path::Path;

/// The metadata the filter needs from a visited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    pub is_dir: bool,
    pub size_bytes: u64,
}

impl From<&std::fs::Metadata> for EntryInfo {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self {
            is_dir: meta.is_dir(),
            size_bytes: meta.len(),
        }
    }
}

/// Filter settings applied to every entry of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Extensions including the leading dot. Empty disables the check.
    pub extensions: Vec<String>,
    /// Entries smaller than this are skipped.
    pub min_size: u64,
    /// File names with fewer characters are skipped. 0 disables the check.
    pub min_name_length: usize,
}

impl EntryFilter {
    /// Whether `path` should be skipped.
    pub fn should_skip(&self, path: &Path, info: EntryInfo) -> bool {
        if should_skip(path, self.extensions.as_slice(), self.min_size, info) {
            return true;
        }

        self.min_name_length > 0 && name_length(path) < self.min_name_length
    }
}

/// Directories, undersized files, and files whose extension is not in a
/// non-empty `extensions` list are skipped.
///
/// The size bound is inclusive: a file of exactly `min_size` bytes passes.
/// Extension comparison is exact and case-sensitive.
pub fn should_skip<S: AsRef<str>>(
    path: &Path,
    extensions: &[S],
    min_size: u64,
    info: EntryInfo,
) -> bool {
    if info.is_dir || info.size_bytes < min_size {
        return true;
    }

    if !extensions.is_empty() {
        let ext = extension_of(path);
        return !extensions.iter().any(|want| want.as_ref().as_bytes() == ext);
    }

    false
}

/// Extension of the final path element, including the leading dot.
///
/// This is the suffix starting at the last `.` of the file name, so
/// `archive.tar.gz` gives `.gz`, `.bashrc` gives `.bashrc`, and `Makefile`
/// gives nothing. Works on the raw name bytes, so names that are not valid
/// UTF-8 still have an extension.
pub fn extension_of(path: &Path) -> &[u8] {
    let Some(name) = path.file_name() else {
        return &[];
    };
    let bytes = name.as_encoded_bytes();
    bytes
        .iter()
        .rposition(|b| *b == b'.')
        .map_or(&bytes[bytes.len()..], |idx| &bytes[idx..])
}

fn name_length(path: &Path) -> usize {
    path.file_name()
        .map_or(0, |name| name.to_string_lossy().chars().count())
}
