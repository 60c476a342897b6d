// src/lock/mod.rs

//! Overlap protection: at most one running instance per job.
//!
//! The guard is a small capability so the locking primitive can be swapped:
//!
//! - [`FlockGuard`] takes a non-blocking advisory `flock` on `<jobdir>/pid`.
//!   The kernel drops the lock when the process dies, so a crashed run never
//!   leaves the job wedged.
//! - [`LockDirGuard`] relies on `mkdir` being atomic. It works where `flock`
//!   does not, at the cost of leaving a stale directory behind if the wrapper
//!   is killed.
//!
//! Both are non-blocking: a held lock is reported as [`LockAttempt::Busy`]
//! immediately, never waited on.

use std::fmt::Debug;

use crate::errors::Result;
use crate::job::JobDir;
use crate::types::LockBackendKind;

pub mod directory;
pub mod flock;

pub use directory::LockDirGuard;
pub use flock::FlockGuard;

/// Result of a single, non-blocking lock attempt.
#[derive(Debug)]
pub enum LockAttempt {
    Acquired(Box<dyn HeldLock>),
    /// Another process currently holds the lock for this job.
    Busy,
}

/// Strategy for acquiring the per-job lock.
pub trait OverlapGuard: Send + Sync + Debug {
    fn try_acquire(&self, job: &JobDir) -> Result<LockAttempt>;
}

/// A lock we currently hold.
pub trait HeldLock: Send + Debug {
    /// Drop the lock and remove its on-disk marker.
    ///
    /// The lock itself is always released; an error only means the marker
    /// could not be cleaned up.
    fn release(self: Box<Self>) -> Result<()>;
}

/// Construct the guard selected on the command line.
pub fn guard_for(kind: LockBackendKind) -> Box<dyn OverlapGuard> {
    match kind {
        LockBackendKind::Flock => Box::new(FlockGuard),
        LockBackendKind::Directory => Box::new(LockDirGuard),
    }
}
