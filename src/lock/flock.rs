// src/lock/flock.rs

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::os::unix::fs::MetadataExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{CronwrapError, Result};
use crate::job::JobDir;

use super::{HeldLock, LockAttempt, OverlapGuard};

const MAX_STALE_RETRIES: usize = 8;

/// `flock(LOCK_EX | LOCK_NB)` on the job's PID file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockGuard;

impl OverlapGuard for FlockGuard {
    fn try_acquire(&self, job: &JobDir) -> Result<LockAttempt> {
        let path = job.pid_file();
        debug!(path = ?path, "attempting to lock PID file");

        // The holder unlinks the file on release. If we locked an inode that
        // was unlinked in between, the lock protects nothing; go again.
        for _ in 0..MAX_STALE_RETRIES {
            // No truncate here: until we hold the lock the content belongs to
            // whoever does.
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)
                .map_err(|e| {
                    CronwrapError::Setup(format!("opening PID file {:?}: {e}", path))
                })?;

            if !try_flock_exclusive(&file)
                .map_err(|e| CronwrapError::Setup(format!("locking PID file {:?}: {e}", path)))?
            {
                debug!(path = ?path, "PID file is locked by another process");
                return Ok(LockAttempt::Busy);
            }

            if !still_linked(&file, &path) {
                debug!(path = ?path, "locked a PID file that was removed meanwhile; retrying");
                continue;
            }

            stamp_pid(&mut file)
                .map_err(|e| CronwrapError::Setup(format!("writing PID file {:?}: {e}", path)))?;
            debug!(path = ?path, pid = std::process::id(), "locked PID file");

            return Ok(LockAttempt::Acquired(Box::new(FlockLock { file, path })));
        }

        Err(CronwrapError::Setup(format!(
            "PID file {:?} keeps disappearing while locking",
            path
        )))
    }
}

#[derive(Debug)]
struct FlockLock {
    file: File,
    path: PathBuf,
}

impl HeldLock for FlockLock {
    fn release(self: Box<Self>) -> Result<()> {
        let FlockLock { file, path } = *self;
        debug!(path = ?path, "removing PID file");
        // Unlink while still holding the lock, then close to drop it.
        let removed = std::fs::remove_file(&path);
        drop(file);
        removed?;
        Ok(())
    }
}

/// Try to acquire an exclusive flock on a file (non-blocking).
///
/// Returns `Ok(true)` if the lock was acquired, `Ok(false)` if the file is
/// already locked by another process.
fn try_flock_exclusive(file: &File) -> io::Result<bool> {
    let fd = file.as_raw_fd();
    // SAFETY: fd is a valid descriptor owned by `file` for the whole call.
    let rc = unsafe { libc::flock(fd, libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        return Ok(true);
    }
    let err = io::Error::last_os_error();
    if err.kind() == io::ErrorKind::WouldBlock || err.raw_os_error() == Some(libc::EWOULDBLOCK) {
        return Ok(false);
    }
    Err(err)
}

/// Whether `path` still names the inode behind `file`.
fn still_linked(file: &File, path: &Path) -> bool {
    match (file.metadata(), std::fs::metadata(path)) {
        (Ok(held), Ok(current)) => held.dev() == current.dev() && held.ino() == current.ino(),
        _ => false,
    }
}

fn stamp_pid(file: &mut File) -> io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    write!(file, "{}", std::process::id())?;
    file.flush()
}
