// src/engine/mod.rs

//! Orchestration of one wrapped run.
//!
//! The [`Orchestrator`] walks a fixed sequence of phases:
//!
//! ```text
//! Init -> Identified -> [Jittered] -> [LockAcquired | Aborted]
//!      -> [PriorityApplied] -> Supervised -> [LockReleased]
//!      -> LedgerUpdated -> Terminal
//! ```
//!
//! Bracketed phases only occur when the matching option is set. `Aborted`
//! is terminal: the job is not run and the ledger is not touched.

use std::io::{self, Write};

pub mod orchestrator;

pub use orchestrator::Orchestrator;

/// Where the orchestrator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Identified,
    Jittered,
    LockAcquired,
    /// Overlap lock was busy.
    Aborted,
    PriorityApplied,
    Supervised,
    LockReleased,
    LedgerUpdated,
    Terminal,
}

/// Final result handed back to `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Exit code of the job (or the synthetic timeout code).
    pub exit_code: i32,
    pub output: Vec<u8>,
    pub timed_out: bool,
    /// Consecutive failures recorded after this run.
    pub failure_count: u32,
    /// Output and failure are withheld from the scheduler.
    pub suppressed: bool,
    /// Phases visited, in order.
    pub phases: Vec<Phase>,
}

impl Outcome {
    /// Status the wrapper itself should exit with.
    ///
    /// Suppression always reports success, whatever the job did.
    pub fn process_exit_code(&self) -> i32 {
        if self.suppressed { 0 } else { self.exit_code }
    }

    /// Write the job's output verbatim, unless suppressed.
    pub fn emit<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.suppressed {
            return Ok(());
        }
        out.write_all(&self.output)?;
        out.flush()
    }
}
