//! Configuration system: TOML file + env var overrides + defaults.
//!
//! Only filters and log settings live here. Action flags (list, delete,
//! archive) are chosen per invocation on the command line.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SweepError};

/// Prefix written ahead of every delete-log line unless overridden.
pub const DEFAULT_DELETE_PREFIX: &str = "DELETED FILE: ";

/// Full filesweep configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub sweep: SweepSection,
    pub log: LogSection,
}

/// Traversal root and entry filters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SweepSection {
    pub root: PathBuf,
    /// Extensions including the leading dot. Empty means no extension filter.
    pub extensions: Vec<String>,
    pub min_size: u64,
    pub min_name_length: usize,
}

/// Delete-log destination and rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSection {
    /// Append delete records to this file; stdout when unset.
    pub file: Option<PathBuf>,
    pub format: LogFormat,
    pub prefix: String,
}

/// Rendering of delete-log lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `<prefix><local timestamp> <path>`
    #[default]
    Text,
    /// One JSON object per line.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "jsonl" | "json" => Ok(Self::Jsonl),
            other => Err(format!("unknown log format {other:?} (expected text or jsonl)")),
        }
    }
}

impl Default for SweepSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extensions: Vec::new(),
            min_size: 0,
            min_name_length: 0,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            file: None,
            format: LogFormat::Text,
            prefix: DEFAULT_DELETE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Default configuration path: `$HOME/.config/filesweep/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        home_dir
            .join(".config")
            .join("filesweep")
            .join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SweepError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if path.is_some() {
            return Err(SweepError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config, reported in the JSON summary.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // sweep
        if let Some(raw) = lookup("FSW_SWEEP_ROOT") {
            self.sweep.root = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("FSW_SWEEP_EXTENSIONS") {
            self.sweep.extensions = raw
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = lookup("FSW_SWEEP_MIN_SIZE") {
            self.sweep.min_size = parse_env("FSW_SWEEP_MIN_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("FSW_SWEEP_MIN_NAME_LENGTH") {
            self.sweep.min_name_length = parse_env("FSW_SWEEP_MIN_NAME_LENGTH", &raw)?;
        }

        // log
        if let Some(raw) = lookup("FSW_LOG_FILE") {
            self.log.file = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup("FSW_LOG_FORMAT") {
            self.log.format = parse_env("FSW_LOG_FORMAT", &raw)?;
        }
        if let Some(raw) = lookup("FSW_LOG_PREFIX") {
            self.log.prefix = raw;
        }

        Ok(())
    }

    /// Check invariants that the filter and logger rely on.
    pub fn validate(&self) -> Result<()> {
        for ext in &self.sweep.extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(SweepError::InvalidConfig {
                    details: format!(
                        "sweep.extensions entry {ext:?} must start with '.' and name an extension"
                    ),
                });
            }
        }

        if self.log.prefix.contains(['\n', '\r']) {
            return Err(SweepError::InvalidConfig {
                details: "log.prefix must not contain line breaks".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|error| SweepError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}
