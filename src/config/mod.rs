// src/config/mod.rs

//! Resolved configuration for a single wrapped invocation.
//!
//! Responsibilities:
//! - Define the immutable `Config` handed to the orchestrator (`model.rs`).
//! - Turn parsed CLI arguments into a validated `Config` (`validate.rs`).

pub mod model;
pub mod validate;

pub use model::Config;
pub use validate::default_workdir;
