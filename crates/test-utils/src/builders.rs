#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use cronwrap::config::Config;
use cronwrap::types::LockBackendKind;

/// Builder for `Config` to simplify test setup.
///
/// Starts from "every policy off", pointed at the given state directory.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new(workdir: impl AsRef<Path>, command: &[&str]) -> Self {
        Self {
            config: Config {
                jitter: None,
                overlap: false,
                nice: 0,
                timeout: None,
                suppress: 0,
                workdir: workdir.as_ref().to_path_buf(),
                lock_backend: LockBackendKind::Flock,
                command: command.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn jitter(mut self, bound: Duration) -> Self {
        self.config.jitter = Some(bound);
        self
    }

    pub fn overlap(mut self, val: bool) -> Self {
        self.config.overlap = val;
        self
    }

    pub fn nice(mut self, val: i32) -> Self {
        self.config.nice = val;
        self
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.config.timeout = Some(limit);
        self
    }

    pub fn suppress(mut self, threshold: u32) -> Self {
        self.config.suppress = threshold;
        self
    }

    pub fn lock_backend(mut self, kind: LockBackendKind) -> Self {
        self.config.lock_backend = kind;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
