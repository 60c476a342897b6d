// src/priority.rs

//! Scheduling priority of the wrapper, inherited by the job it spawns.
//!
//! Must run after the overlap lock is won. A wrapper that drops its priority
//! first can be starved by a busy box before it ever reaches the lock, and
//! cron keeps piling new instances on top of it.

use std::io;

use tracing::debug;

use crate::errors::{CronwrapError, Result};

/// Set the niceness of the current process to `nice`, a la nice(1).
///
/// `0` is a no-op. Negative values need privilege; without it the call fails
/// and the error is returned rather than running at an unintended priority.
///
/// On Linux the niceness is per thread, so this must be called from the
/// thread that later spawns the job.
pub fn apply(nice: i32) -> Result<()> {
    if nice == 0 {
        return Ok(());
    }

    debug!(nice, "setting priority");
    // SAFETY: plain syscall on the calling process; no pointers involved.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS, 0, nice) };
    if rc != 0 {
        return Err(CronwrapError::Priority {
            nice,
            source: io::Error::last_os_error(),
        });
    }

    Ok(())
}
