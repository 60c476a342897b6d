// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::types::LockBackendKind;

/// Fully resolved settings for one run of the wrapper.
///
/// Built once, before any job logic runs, and never mutated afterwards.
/// Zero durations from the command line are normalised to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound for the pre-execution delay.
    pub jitter: Option<Duration>,

    /// Refuse to start while another run of the same job holds the lock.
    pub overlap: bool,

    /// Niceness to apply before spawning the job; 0 leaves it untouched.
    pub nice: i32,

    /// Maximum runtime before escalating termination.
    pub timeout: Option<Duration>,

    /// Consecutive failures tolerated before output is surfaced; 0 disables.
    pub suppress: u32,

    /// Root of the per-job state directories.
    pub workdir: PathBuf,

    pub lock_backend: LockBackendKind,

    /// The job: program followed by its arguments. Never empty.
    pub command: Vec<String>,
}

impl Config {
    /// Whether the failure ledger may swallow output at all.
    pub fn suppression_enabled(&self) -> bool {
        self.suppress > 0
    }
}
