// src/logging.rs

//! Diagnostics for `cronwrap` via `tracing`.
//!
//! Level, highest priority first: `--log-level`, `--debug`, `CRONWRAP_LOG`,
//! then `warn`. A healthy run prints nothing, since anything cron sees on
//! either stream gets mailed.
//!
//! Everything goes to stderr; stdout belongs to the job.

use std::str::FromStr;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "CRONWRAP_LOG";

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install the global subscriber. Call once, before the orchestrator runs.
pub fn init_logging(cli_level: Option<LogLevel>, debug: bool) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = resolve_level(cli_level, debug, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))?;

    Ok(())
}

/// Effective level for the given flag, debug switch and `CRONWRAP_LOG` value.
///
/// An unrecognised environment value is ignored rather than fatal.
pub fn resolve_level(cli_level: Option<LogLevel>, debug: bool, env_value: Option<&str>) -> Level {
    if let Some(lvl) = cli_level {
        return lvl.into();
    }
    if debug {
        return Level::DEBUG;
    }
    env_value
        .and_then(|s| Level::from_str(s.trim()).ok())
        .unwrap_or(Level::WARN)
}
