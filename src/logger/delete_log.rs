//! Delete log: one append-only line per successfully removed file.
//!
//! Lines are assembled in memory and handed to the sink with a single
//! `write_all`, so a log file tailed by another process never shows a partial
//! record. Two renderings are supported:
//!
//! - text: `DELETED FILE: 2026/10/16 09:41:07 some/dir/file.log`
//! - jsonl: `{"ts":"2026-10-16T07:41:07.123Z","event":"file_delete",...}`

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::{DEFAULT_DELETE_PREFIX, LogFormat};
use crate::core::errors::{Result, SweepError};

/// Local-time layout used by the text rendering.
const TEXT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Event types recorded in the JSONL rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FileDelete,
}

/// A single JSONL delete record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Configured line prefix, kept so text and JSONL logs carry the same data.
    pub prefix: String,
    /// Removed path, as produced by the traversal.
    pub path: String,
}

impl LogEntry {
    /// Create a delete record stamped with the current UTC time.
    pub fn deleted(prefix: &str, path: &Path) -> Self {
        Self {
            ts: format_utc_now(),
            event: EventType::FileDelete,
            prefix: prefix.to_string(),
            path: path.to_string_lossy().into_owned(),
        }
    }
}

/// Writer for delete records over any byte sink.
pub struct DeleteLog<W: Write> {
    sink: W,
    prefix: String,
    format: LogFormat,
    lines_written: u64,
}

impl<W: Write> DeleteLog<W> {
    /// Text-format log with the default `DELETED FILE: ` prefix.
    pub fn new(sink: W) -> Self {
        Self::with_format(sink, DEFAULT_DELETE_PREFIX, LogFormat::Text)
    }

    /// Log with an explicit prefix and rendering.
    pub fn with_format(sink: W, prefix: impl Into<String>, format: LogFormat) -> Self {
        Self {
            sink,
            prefix: prefix.into(),
            format,
            lines_written: 0,
        }
    }

    /// Record one successful deletion.
    pub fn record_delete(&mut self, path: &Path) -> Result<()> {
        let line = match self.format {
            LogFormat::Text => format!(
                "{}{} {}\n",
                self.prefix,
                chrono::Local::now().format(TEXT_TIMESTAMP_FORMAT),
                path.display()
            ),
            LogFormat::Jsonl => {
                let entry = LogEntry::deleted(&self.prefix, path);
                format!("{}\n", serde_json::to_string(&entry)?)
            }
        };

        self.sink
            .write_all(line.as_bytes())
            .and_then(|()| self.sink.flush())
            .map_err(|source| SweepError::sink("delete log", source))?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Consume the log and hand back its sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
