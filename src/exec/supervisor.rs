// src/exec/supervisor.rs

//! Production process backend.

use std::fs::File;
use std::future::Future;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::process::ExitStatusExt;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::unix::pipe;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{CronwrapError, Result};
use crate::types::TIMEOUT_EXIT_CODE;

use super::backend::{ProcessBackend, RunResult};
use super::terminate::{escalate, EscalationPolicy};

/// Spawns the job and races its completion against the timeout.
#[derive(Debug, Clone, Default)]
pub struct ProcessSupervisor {
    escalation: EscalationPolicy,
}

impl ProcessSupervisor {
    pub fn new(escalation: EscalationPolicy) -> Self {
        Self { escalation }
    }

    async fn supervise(&self, argv: &[String], timeout: Option<Duration>) -> Result<RunResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CronwrapError::Usage("must specify a command".to_string()))?;

        // stdout and stderr share one pipe so the job's output keeps its
        // original interleaving.
        let (reader, writer) = io::pipe()?;
        let writer_err = writer.try_clone()?;
        let receiver = pipe::Receiver::from_file(File::from(OwnedFd::from(reader)))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err)
            .kill_on_drop(true);

        debug!(program = %program, "spawning job");
        let spawned = cmd.spawn();
        // The command still owns our copies of the write end; without this
        // the reader never sees EOF.
        drop(cmd);
        let mut child = spawned.map_err(|source| CronwrapError::Spawn {
            command: program.clone(),
            source,
        })?;
        info!(pid = child.id(), "job started");

        let mut output = tokio::spawn(read_to_end(receiver));

        let raced = {
            let completion = async {
                let status = child.wait().await?;
                let bytes = (&mut output).await.map_err(io::Error::other)??;
                Ok::<_, io::Error>((status, bytes))
            };
            let deadline = async {
                match timeout {
                    Some(limit) => tokio::time::sleep(limit).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                finished = completion => Race::Finished(finished),
                () = deadline => Race::TimedOut,
            }
        };

        match raced {
            Race::Finished(finished) => {
                let (status, output) = finished?;
                let exit_code = exit_code_of(status);
                info!(exit_code, "job exited");
                debug!(bytes = output.len(), "captured output from job");
                Ok(RunResult {
                    output,
                    exit_code,
                    timed_out: false,
                })
            }
            Race::TimedOut => {
                output.abort();
                let termination = escalate(&mut child, &self.escalation).await;
                info!(?termination, "job timed out, terminated");
                Ok(RunResult {
                    output: Vec::new(),
                    exit_code: TIMEOUT_EXIT_CODE,
                    timed_out: true,
                })
            }
        }
    }
}

impl ProcessBackend for ProcessSupervisor {
    fn run<'a>(
        &'a mut self,
        argv: &'a [String],
        timeout: Option<Duration>,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>> {
        Box::pin(self.supervise(argv, timeout))
    }
}

enum Race {
    Finished(io::Result<(ExitStatus, Vec<u8>)>),
    TimedOut,
}

async fn read_to_end(mut receiver: pipe::Receiver) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    receiver.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Exit code as a shell would report it.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}
