#![allow(dead_code)]

pub use cronwrap_test_utils::builders;
pub use cronwrap_test_utils::fake_supervisor;
pub use cronwrap_test_utils::{init_tracing, with_timeout};

use std::path::Path;
use std::process::{Command, Output};

/// Path of the compiled `cronwrap` binary.
pub fn cronwrap_bin() -> &'static str {
    env!("CARGO_BIN_EXE_cronwrap")
}

/// Run the wrapper binary with its state kept under `workdir`.
pub fn run_cronwrap(workdir: &Path, args: &[&str]) -> Output {
    Command::new(cronwrap_bin())
        .arg("--workdir")
        .arg(workdir)
        .args(args)
        .output()
        .expect("failed to run cronwrap binary")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
