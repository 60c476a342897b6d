// src/lock/directory.rs

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::errors::{CronwrapError, Result};
use crate::job::JobDir;

use super::{HeldLock, LockAttempt, OverlapGuard};

/// Lock by atomically creating `<jobdir>/lock.d`.
///
/// The holder's PID is written to `lock.d/pid` for diagnostics only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockDirGuard;

impl OverlapGuard for LockDirGuard {
    fn try_acquire(&self, job: &JobDir) -> Result<LockAttempt> {
        let path = job.lock_dir();
        debug!(path = ?path, "attempting to create lock directory");

        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = ?path, "lock directory already exists");
                return Ok(LockAttempt::Busy);
            }
            Err(e) => {
                return Err(CronwrapError::Setup(format!(
                    "creating lock directory {:?}: {e}",
                    path
                )));
            }
        }

        let pid_path = path.join("pid");
        if let Err(e) = fs::write(&pid_path, std::process::id().to_string()) {
            warn!(path = ?pid_path, error = %e, "could not record PID in lock directory");
        }

        Ok(LockAttempt::Acquired(Box::new(DirLock { path })))
    }
}

#[derive(Debug)]
struct DirLock {
    path: PathBuf,
}

impl HeldLock for DirLock {
    fn release(self: Box<Self>) -> Result<()> {
        debug!(path = ?self.path, "removing lock directory");
        fs::remove_dir_all(&self.path)?;
        Ok(())
    }
}
