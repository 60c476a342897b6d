// src/exec/terminate.rs

//! Graceful-then-forceful termination of a timed-out job.

use std::io;
use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, warn};

/// How long a job gets to react to SIGTERM before SIGKILL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    /// Liveness checks after SIGTERM.
    pub attempts: u32,
    /// Pause between liveness checks.
    pub interval: Duration,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_secs(1),
        }
    }
}

/// How the child ended up going away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited before we could signal it.
    AlreadyExited,
    /// Exited within the grace window after SIGTERM.
    Graceful,
    /// Needed SIGKILL.
    Killed,
}

/// SIGTERM the child, poll it for the policy's window, then SIGKILL it.
///
/// Always reaps the child before returning.
pub async fn escalate(child: &mut Child, policy: &EscalationPolicy) -> Termination {
    let Some(pid) = child.id() else {
        debug!("process already reaped; nothing to terminate");
        return Termination::AlreadyExited;
    };

    debug!(pid, "process timed out, sending SIGTERM");
    if let Err(e) = send_signal(pid, libc::SIGTERM) {
        warn!(pid, error = %e, "failed to send SIGTERM");
    }

    for _ in 0..policy.attempts {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(pid, ?status, "process exited after SIGTERM");
                return Termination::Graceful;
            }
            Ok(None) => {}
            Err(e) => warn!(pid, error = %e, "failed to poll process state"),
        }
        tokio::time::sleep(policy.interval).await;
    }

    debug!(pid, "process did not die, sending SIGKILL");
    if let Err(e) = child.kill().await {
        warn!(pid, error = %e, "failed to kill process");
    }
    Termination::Killed
}

fn send_signal(pid: u32, signal: libc::c_int) -> io::Result<()> {
    let pid = libc::pid_t::try_from(pid).map_err(io::Error::other)?;
    // SAFETY: signalling a child we spawned and have not reaped yet.
    let rc = unsafe { libc::kill(pid, signal) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
