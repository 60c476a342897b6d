// src/ledger.rs

//! Consecutive-failure bookkeeping.
//!
//! One decimal counter per job in `<jobdir>/failcount`, rewritten on every
//! run. A zero exit resets it; anything else increments it. Missing or
//! garbled content counts as "no history".
//!
//! Without overlap protection two runs of the same job can race on the file;
//! the last writer wins. With `--overlap` writers are already serialized.

use std::path::PathBuf;

use tracing::debug;

use crate::errors::{CronwrapError, Result};
use crate::fs::FileSystem;
use crate::job::JobDir;

/// What the ledger decided for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerUpdate {
    /// Count persisted after this run.
    pub count: u32,
    /// Whether output and exit status should be withheld from the scheduler.
    pub suppress: bool,
}

/// Pure suppression rule.
///
/// With `threshold == 0` nothing is ever suppressed. Otherwise successes are
/// always suppressed, and failures are suppressed until the streak reaches
/// `threshold`.
pub fn decide(previous: u32, exit_code: i32, threshold: u32) -> LedgerUpdate {
    let count = if exit_code == 0 {
        0
    } else {
        previous.saturating_add(1)
    };

    let suppress = threshold > 0 && (exit_code == 0 || count < threshold);

    LedgerUpdate { count, suppress }
}

/// Failure counter of a single job, backed by a [`FileSystem`].
#[derive(Debug)]
pub struct FailureLedger<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> FailureLedger<'a> {
    pub fn new(fs: &'a dyn FileSystem, job: &JobDir) -> Self {
        Self {
            fs,
            path: job.failcount_file(),
        }
    }

    /// Previous consecutive-failure count; 0 when absent or unreadable.
    pub fn read(&self) -> u32 {
        let Ok(contents) = self.fs.read_to_string(&self.path) else {
            debug!(path = ?self.path, "no previous failure count");
            return 0;
        };

        match contents.trim().parse::<u32>() {
            Ok(count) => {
                debug!(count, "old failure count");
                count
            }
            Err(e) => {
                debug!(path = ?self.path, error = %e, "ignoring unparsable failure count");
                0
            }
        }
    }

    pub fn write(&self, count: u32) -> Result<()> {
        debug!(count, "saving failure count for this job");
        self.fs
            .write(&self.path, count.to_string().as_bytes())
            .map_err(|e| CronwrapError::Setup(format!("saving failure count: {e:#}")))
    }

    /// Fold `exit_code` into the counter and persist the result.
    pub fn update(&self, exit_code: i32, threshold: u32) -> Result<LedgerUpdate> {
        let previous = if exit_code == 0 { 0 } else { self.read() };
        let update = decide(previous, exit_code, threshold);
        debug!(
            exit_code,
            count = update.count,
            suppress = update.suppress,
            "failure count for this job"
        );
        self.write(update.count)?;
        Ok(update)
    }
}
