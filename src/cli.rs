// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Everything after the wrapper's own flags (or after `--`) is the job
//! command and is passed through untouched.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::types::{parse_duration, LockBackendKind};

/// Command-line arguments for `cronwrap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cronwrap",
    version,
    about = "Run a cron job with jitter, overlap protection, timeouts and failure suppression.",
    long_about = None
)]
pub struct CliArgs {
    /// Random delay before executing job (e.g. 30s, 5m).
    #[arg(long, value_name = "DURATION", value_parser = parse_duration, default_value = "0")]
    pub jitter: Duration,

    /// Prevent multiple simultaneous copies of job.
    #[arg(long)]
    pub overlap: bool,

    /// Set process priority, a la the utility nice.
    #[arg(long, value_name = "N", default_value_t = 0, allow_negative_numbers = true)]
    pub nice: i32,

    /// Terminate job if it runs longer than given time.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration, default_value = "0")]
    pub timeout: Duration,

    /// Suppress errors unless job has N consecutive failures.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub suppress: u32,

    /// Print lots of messages about what cronwrap is doing.
    #[arg(long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Overrides `--debug` and `CRONWRAP_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Directory holding per-job state.
    ///
    /// Default: `CRONWRAP_DIR`, then `$HOME/.cronwrap`.
    #[arg(long, value_name = "PATH")]
    pub workdir: Option<PathBuf>,

    /// Primitive used for overlap protection.
    #[arg(long, value_enum, value_name = "KIND", default_value = "flock")]
    pub lock_backend: LockBackendKind,

    /// The job command and its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::try_parse()`.
pub fn try_parse() -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}
