// src/job/mod.rs

//! Job identity and the per-job state directory.
//!
//! A job is its exact argument vector. [`identity`] turns that vector into a
//! stable content hash; [`dir`] maps the hash onto `<workdir>/<job-id>/` and
//! names the files kept there.

pub mod dir;
pub mod identity;

pub use dir::JobDir;
pub use identity::{canonical_label, JobId};
