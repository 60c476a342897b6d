// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::Config;
use crate::errors::{CronwrapError, Result};

/// Environment variable overriding the state directory.
pub const WORKDIR_ENV: &str = "CRONWRAP_DIR";

impl TryFrom<CliArgs> for Config {
    type Error = CronwrapError;

    fn try_from(args: CliArgs) -> std::result::Result<Self, Self::Error> {
        ensure_has_command(&args)?;

        let workdir = match args.workdir {
            Some(dir) => dir,
            None => default_workdir()?,
        };

        Ok(Config {
            jitter: non_zero(args.jitter),
            overlap: args.overlap,
            nice: args.nice,
            timeout: non_zero(args.timeout),
            suppress: args.suppress,
            workdir,
            lock_backend: args.lock_backend,
            command: args.command,
        })
    }
}

fn ensure_has_command(args: &CliArgs) -> Result<()> {
    match args.command.first() {
        Some(program) if !program.is_empty() => Ok(()),
        _ => Err(CronwrapError::Usage("must specify a command".to_string())),
    }
}

fn non_zero(d: Duration) -> Option<Duration> {
    if d.is_zero() { None } else { Some(d) }
}

/// Resolve the per-user state directory.
///
/// `CRONWRAP_DIR` wins if set; otherwise `$HOME/.cronwrap`. System paths like
/// `/var/lib` would restrict the tool to root, and temp directories get
/// cleaned up underneath us, so the home directory is the fallback.
pub fn default_workdir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(WORKDIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".cronwrap"))
        .ok_or_else(|| {
            CronwrapError::Setup(format!(
                "cannot locate a state directory: set HOME or {WORKDIR_ENV}"
            ))
        })
}
