// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod jitter;
pub mod job;
pub mod ledger;
pub mod lock;
pub mod logging;
pub mod priority;
pub mod types;

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::engine::{Orchestrator, Outcome};
use crate::errors::Result;
use crate::exec::ProcessSupervisor;
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the real filesystem for job state
/// - the configured overlap lock backend
/// - the process supervisor
///
/// then prints whatever the scheduler is allowed to see and returns the exit
/// status the wrapper should terminate with.
pub async fn run(config: Config) -> Result<i32> {
    let guard = lock::guard_for(config.lock_backend);
    let orchestrator = Orchestrator::new(
        config,
        Arc::new(RealFileSystem),
        guard,
        ProcessSupervisor::default(),
    );

    let outcome = orchestrator.run().await?;

    let mut stdout = std::io::stdout().lock();
    Ok(deliver(&outcome, &mut stdout))
}

/// Hand the job's output to the scheduler and pick the wrapper's exit status.
///
/// The ledger is already written at this point, so a closed or broken stdout
/// only costs the output. The job's status is reported regardless.
pub fn deliver<W: Write>(outcome: &Outcome, out: &mut W) -> i32 {
    if let Err(e) = outcome.emit(out) {
        warn!(error = %e, "failed to write job output");
    }

    debug!(
        exit_code = outcome.process_exit_code(),
        suppressed = outcome.suppressed,
        "cronwrap finished"
    );
    outcome.process_exit_code()
}
