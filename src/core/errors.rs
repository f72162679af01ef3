//! FSW-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SweepError>;

/// Top-level error type for filesweep.
///
/// Every variant is terminal: a sweep stops at the first error it meets.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("[FSW-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[FSW-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[FSW-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[FSW-2001] archive destination {path} is not accessible: {source}")]
    ArchiveDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FSW-2002] {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("[FSW-2003] {path} is not inside traversal root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("[FSW-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[FSW-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[FSW-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[FSW-3003] failed to write to {sink}: {source}")]
    Sink {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("[FSW-3004] traversal failure: {details}")]
    Traversal { details: String },
}

impl SweepError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "FSW-1001",
            Self::MissingConfig { .. } => "FSW-1002",
            Self::ConfigParse { .. } => "FSW-1003",
            Self::ArchiveDestination { .. } => "FSW-2001",
            Self::NotADirectory { .. } => "FSW-2002",
            Self::OutsideRoot { .. } => "FSW-2003",
            Self::Serialization { .. } => "FSW-2101",
            Self::PermissionDenied { .. } => "FSW-3001",
            Self::Io { .. } => "FSW-3002",
            Self::Sink { .. } => "FSW-3003",
            Self::Traversal { .. } => "FSW-3004",
        }
    }

    /// Whether the failure came from user-supplied settings rather than the
    /// filesystem at run time.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::NotADirectory { .. }
                | Self::ArchiveDestination { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    ///
    /// `PermissionDenied` IO errors are reported with their own code.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            return Self::PermissionDenied { path };
        }
        Self::Io { path, source }
    }

    /// Convenience constructor for output/log sink failures.
    #[must_use]
    pub const fn sink(sink: &'static str, source: std::io::Error) -> Self {
        Self::Sink { sink, source }
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SweepError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<walkdir::Error> for SweepError {
    fn from(value: walkdir::Error) -> Self {
        let path = value.path().map(Path::to_path_buf);
        let details = value.to_string();
        match (path, value.into_io_error()) {
            (Some(path), Some(source)) => Self::io(path, source),
            _ => Self::Traversal { details },
        }
    }
}
