// src/job/dir.rs

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{CronwrapError, Result};
use crate::fs::FileSystem;
use crate::job::identity::{canonical_label, JobId};

/// Name of the write-once label file.
pub const COMMAND_FILE: &str = "command";
/// Name of the advisory lock / PID file.
pub const PID_FILE: &str = "pid";
/// Name of the lock directory used by the `directory` lock backend.
pub const LOCK_DIR: &str = "lock.d";
/// Name of the consecutive-failure counter.
pub const FAILCOUNT_FILE: &str = "failcount";

/// The on-disk home of one job: `<workdir>/<job-id>/`.
///
/// Created lazily, never removed by cronwrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDir {
    id: JobId,
    path: PathBuf,
}

impl JobDir {
    /// Create (if needed) the directory for `id` and drop a label file in it.
    ///
    /// Safe to race with other invocations of the same job: an existing
    /// directory is fine, and the label is written by whoever creates it
    /// first. Failing to write the label only costs readability, so it is
    /// logged and otherwise ignored.
    pub fn ensure(
        fs: &dyn FileSystem,
        workdir: &Path,
        id: &JobId,
        argv: &[String],
    ) -> Result<Self> {
        let path = workdir.join(id.as_str());
        fs.create_dir_all(&path).map_err(|e| {
            CronwrapError::Setup(format!("creating job directory {:?}: {e:#}", path))
        })?;

        let dir = JobDir {
            id: id.clone(),
            path,
        };

        let label_path = dir.command_file();
        if !fs.exists(&label_path) {
            match fs.create_new(&label_path, canonical_label(argv).as_bytes()) {
                Ok(true) => debug!(path = ?label_path, "wrote command label"),
                Ok(false) => debug!(path = ?label_path, "command label already present"),
                Err(e) => warn!(path = ?label_path, error = %e, "could not write command label"),
            }
        }

        Ok(dir)
    }

    /// Refer to an existing job directory without touching the filesystem.
    pub fn at(workdir: &Path, id: &JobId) -> Self {
        JobDir {
            id: id.clone(),
            path: workdir.join(id.as_str()),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn command_file(&self) -> PathBuf {
        self.path.join(COMMAND_FILE)
    }

    pub fn pid_file(&self) -> PathBuf {
        self.path.join(PID_FILE)
    }

    pub fn lock_dir(&self) -> PathBuf {
        self.path.join(LOCK_DIR)
    }

    pub fn failcount_file(&self) -> PathBuf {
        self.path.join(FAILCOUNT_FILE)
    }
}
