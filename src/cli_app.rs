//! Top-level CLI definition and dispatch.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::{Colorize, control};
use thiserror::Error;

use filesweep::core::config::{Config, LogFormat};
use filesweep::core::errors::SweepError;
use filesweep::logger::delete_log::DeleteLog;
use filesweep::scanner::dispatch::ActionFlags;
use filesweep::scanner::filter::EntryFilter;
use filesweep::scanner::walker::{RunReport, SweepConfig, Sweeper};

/// filesweep: list, delete, or archive files under a directory tree.
#[derive(Debug, Parser)]
#[command(
    name = "filesweep",
    author,
    version,
    about = "Walk a directory tree and list, delete, or archive matching files",
    long_about = None
)]
pub struct Cli {
    /// Root directory to start from.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
    /// Append delete records to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
    /// List files only; overrides --del and --archive.
    #[arg(long)]
    list: bool,
    /// Delete matching files.
    #[arg(long)]
    del: bool,
    /// Gzip matching files into this directory, mirroring the tree.
    #[arg(long, value_name = "DIR")]
    archive: Option<PathBuf>,
    /// Only process files with this extension, including the dot (repeatable).
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    extensions: Vec<String>,
    /// Minimum file size in bytes.
    #[arg(long, value_name = "BYTES")]
    size: Option<u64>,
    /// Minimum number of characters in the file name.
    #[arg(long, value_name = "N")]
    name_length: Option<usize>,
    /// Delete-log rendering: text or jsonl.
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Print run counters to stderr when the sweep completes.
    #[arg(long)]
    summary: bool,
    /// Render the summary as a single JSON line.
    #[arg(long, requires = "summary")]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Filesystem or sink failure during the sweep.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<SweepError> for CliError {
    fn from(err: SweepError) -> Self {
        if err.is_user_error() {
            Self::User(err.to_string())
        } else if matches!(err, SweepError::Serialization { .. }) {
            Self::Internal(err.to_string())
        } else {
            Self::Runtime(err.to_string())
        }
    }
}

/// Load config, layer CLI flags on top, and run one sweep.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    apply_cli_overrides(cli, &mut config);
    config.validate()?;

    let sweep = SweepConfig {
        filter: EntryFilter {
            extensions: config.sweep.extensions.clone(),
            min_size: config.sweep.min_size,
            min_name_length: config.sweep.min_name_length,
        },
        actions: ActionFlags {
            list: cli.list,
            delete: cli.del,
            archive: cli.archive.clone(),
        },
    };

    let sink = open_log_sink(config.log.file.as_deref())?;
    let mut delete_log = DeleteLog::with_format(sink, config.log.prefix.clone(), config.log.format);
    let mut out = io::stdout().lock();

    let report = Sweeper::new(sweep).run(&config.sweep.root, &mut out, &mut delete_log)?;

    if cli.summary {
        emit_summary(cli, &config, &report)?;
    }
    Ok(())
}

fn apply_cli_overrides(cli: &Cli, config: &mut Config) {
    if let Some(root) = &cli.root {
        config.sweep.root.clone_from(root);
    }
    if !cli.extensions.is_empty() {
        config.sweep.extensions.clone_from(&cli.extensions);
    }
    if let Some(size) = cli.size {
        config.sweep.min_size = size;
    }
    if let Some(name_length) = cli.name_length {
        config.sweep.min_name_length = name_length;
    }
    if let Some(log) = &cli.log {
        config.log.file = Some(log.clone());
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
}

/// Delete records go to `path` (appended, created 0644) or to stdout.
fn open_log_sink(path: Option<&Path>) -> Result<Box<dyn Write>, CliError> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdout()));
    };

    let mut options = OpenOptions::new();
    options.append(true).create(true).read(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let file = options
        .open(path)
        .map_err(|source| SweepError::io(path, source))?;
    Ok(Box::new(file))
}

fn emit_summary(cli: &Cli, config: &Config, report: &RunReport) -> Result<(), CliError> {
    let root = &config.sweep.root;
    let mut err = io::stderr().lock();
    if cli.json {
        let payload = serde_json::json!({
            "command": "sweep",
            "root": root.to_string_lossy(),
            "config_hash": config.stable_hash()?,
            "report": report,
        });
        writeln!(err, "{}", serde_json::to_string(&payload)?)?;
        return Ok(());
    }

    writeln!(err, "{} {}", "Sweep complete:".bold(), root.display())?;
    writeln!(
        err,
        "  visited {}  skipped {}  listed {}",
        report.visited, report.skipped, report.listed
    )?;
    writeln!(
        err,
        "  {} {}  {} {} ({} bytes)",
        "deleted".red(),
        report.deleted,
        "archived".green(),
        report.archived,
        report.bytes_archived
    )?;
    Ok(())
}
