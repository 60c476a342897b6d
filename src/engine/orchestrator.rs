// src/engine/orchestrator.rs

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{CronwrapError, Result};
use crate::exec::{ProcessBackend, RunResult};
use crate::fs::FileSystem;
use crate::jitter;
use crate::job::{JobDir, JobId};
use crate::ledger::FailureLedger;
use crate::lock::{HeldLock, LockAttempt, OverlapGuard};
use crate::priority;

use super::{Outcome, Phase};

/// Sequences identity, jitter, locking, priority, execution and the
/// failure ledger for a single invocation.
///
/// Strictly sequential: the only concurrency is inside the process backend,
/// while the job races its timeout.
#[derive(Debug)]
pub struct Orchestrator<P: ProcessBackend> {
    config: Config,
    fs: Arc<dyn FileSystem>,
    guard: Box<dyn OverlapGuard>,
    process: P,
    phases: Vec<Phase>,
}

impl<P: ProcessBackend> Orchestrator<P> {
    pub fn new(
        config: Config,
        fs: Arc<dyn FileSystem>,
        guard: Box<dyn OverlapGuard>,
        process: P,
    ) -> Self {
        Self {
            config,
            fs,
            guard,
            process,
            phases: vec![Phase::Init],
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phases.last().copied().unwrap_or(Phase::Init)
    }

    fn advance(&mut self, next: Phase) {
        debug!(from = ?self.phase(), to = ?next, "phase transition");
        self.phases.push(next);
    }

    /// Run the job once and decide what the scheduler gets to see.
    ///
    /// Returns `Err` only for wrapper-level failures, including a busy
    /// overlap lock. Job failures and timeouts come back as an [`Outcome`].
    pub async fn run(mut self) -> Result<Outcome> {
        let id = JobId::from_argv(&self.config.command);
        debug!(job = %id, "command hash");
        let job = JobDir::ensure(
            self.fs.as_ref(),
            &self.config.workdir,
            &id,
            &self.config.command,
        )?;
        self.advance(Phase::Identified);

        if let Some(bound) = self.config.jitter {
            self.delay(bound).await?;
        }

        let lock = if self.config.overlap {
            debug!("overlap protection enabled, checking for existing process");
            match self.guard.try_acquire(&job)? {
                LockAttempt::Acquired(lock) => {
                    self.advance(Phase::LockAcquired);
                    Some(lock)
                }
                LockAttempt::Busy => {
                    self.advance(Phase::Aborted);
                    return Err(CronwrapError::JobBusy { job: id.to_string() });
                }
            }
        } else {
            None
        };

        // The lock is released on every path out of here, including a
        // failed spawn or priority change.
        let run = self.execute().await;
        if let Some(lock) = lock {
            self.release(lock);
        }
        let run = run?;

        let ledger = FailureLedger::new(self.fs.as_ref(), &job);
        let update = ledger.update(run.exit_code, self.config.suppress)?;
        self.advance(Phase::LedgerUpdated);

        if update.suppress {
            debug!("suppressing output");
        }
        self.advance(Phase::Terminal);

        Ok(Outcome {
            exit_code: run.exit_code,
            output: run.output,
            timed_out: run.timed_out,
            failure_count: update.count,
            suppressed: update.suppress,
            phases: self.phases,
        })
    }

    async fn delay(&mut self, bound: std::time::Duration) -> Result<()> {
        let host = jitter::hostname()
            .map_err(|e| CronwrapError::Setup(format!("looking up hostname: {e}")))?;
        let delay = jitter::compute_delay(bound, &host);
        debug!(seconds = delay.as_secs(), "jitter delay");
        tokio::time::sleep(delay).await;
        self.advance(Phase::Jittered);
        Ok(())
    }

    async fn execute(&mut self) -> Result<RunResult> {
        if self.config.nice != 0 {
            priority::apply(self.config.nice)?;
            self.advance(Phase::PriorityApplied);
        }

        let result = self
            .process
            .run(&self.config.command, self.config.timeout)
            .await?;
        self.advance(Phase::Supervised);
        Ok(result)
    }

    fn release(&mut self, lock: Box<dyn HeldLock>) {
        if let Err(e) = lock.release() {
            warn!(error = %e, "failed to clean up overlap lock");
        }
        self.advance(Phase::LockReleased);
    }
}
