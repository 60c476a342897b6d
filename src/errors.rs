// src/errors.rs

//! Crate-wide error type.
//!
//! Only wrapper-level failures are errors. A job that exits non-zero or runs
//! past its timeout is a normal outcome and never shows up here.

use thiserror::Error;

use crate::types::WRAPPER_ERROR_EXIT_CODE;

#[derive(Error, Debug)]
pub enum CronwrapError {
    #[error("Error: {0}")]
    Usage(String),

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Job is already running")]
    JobBusy { job: String },

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to set priority to {nice}: {source}")]
    Priority {
        nice: i32,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CronwrapError {
    /// Process exit status used when the wrapper itself gives up.
    pub fn exit_code(&self) -> i32 {
        WRAPPER_ERROR_EXIT_CODE
    }
}

pub type Result<T> = std::result::Result<T, CronwrapError>;
