// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! - `ProcessSupervisor` is the implementation used by `cronwrap`.
//! - Tests can provide their own `ProcessBackend` that returns canned
//!   results without spawning anything.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Result;

/// Outcome of running the job exactly once.
///
/// Only the exit code outlives the process; the output is either printed or
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Interleaved stdout and stderr, in the order the job wrote them.
    /// Always empty after a timeout.
    pub output: Vec<u8>,
    /// Real exit code, `128 + signal` for signalled jobs, or
    /// [`crate::types::TIMEOUT_EXIT_CODE`] after a timeout.
    pub exit_code: i32,
    pub timed_out: bool,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait abstracting how the job is executed.
pub trait ProcessBackend: Send {
    /// Run `argv` to completion or until `timeout` elapses.
    ///
    /// Errors are reserved for the job never starting (missing executable,
    /// permission denied). Non-zero exits and timeouts are `Ok`.
    fn run<'a>(
        &'a mut self,
        argv: &'a [String],
        timeout: Option<Duration>,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>>;
}
