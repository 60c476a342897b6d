// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the job command, using
//! `tokio::process::Command`, and handing back a [`RunResult`].
//!
//! - [`backend`] provides the `ProcessBackend` trait. The orchestrator only
//!   talks to this trait, so tests can swap in a scripted fake.
//! - [`supervisor`] is the production backend: spawn, capture combined
//!   output, race completion against the timeout.
//! - [`terminate`] holds the SIGTERM-then-SIGKILL escalation used when the
//!   timeout wins.

pub mod backend;
pub mod supervisor;
pub mod terminate;

pub use backend::{ProcessBackend, RunResult};
pub use supervisor::ProcessSupervisor;
pub use terminate::{EscalationPolicy, Termination};
