use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cronwrap::errors::Result;
use cronwrap::exec::{ProcessBackend, RunResult};

type Hook = Box<dyn FnMut(&[String]) + Send>;

/// A fake process backend that:
/// - records every command it was asked to run (with its timeout)
/// - answers with scripted `RunResult`s, in order
/// - once the script runs out, reports a silent success.
pub struct FakeSupervisor {
    script: VecDeque<RunResult>,
    calls: Arc<Mutex<Vec<(Vec<String>, Option<Duration>)>>>,
    hook: Option<Hook>,
}

impl FakeSupervisor {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            hook: None,
        }
    }

    /// Queue a run that exits with `code` after printing `output`.
    pub fn then_exit(mut self, code: i32, output: &str) -> Self {
        self.script.push_back(RunResult {
            output: output.as_bytes().to_vec(),
            exit_code: code,
            timed_out: false,
        });
        self
    }

    /// Queue a run that hits its timeout.
    pub fn then_time_out(mut self) -> Self {
        self.script.push_back(RunResult {
            output: Vec::new(),
            exit_code: cronwrap::types::TIMEOUT_EXIT_CODE,
            timed_out: true,
        });
        self
    }

    /// Call `hook` while the "job" is running.
    pub fn with_hook(mut self, hook: impl FnMut(&[String]) + Send + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Shared handle on the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<(Vec<String>, Option<Duration>)>>> {
        Arc::clone(&self.calls)
    }
}

impl Default for FakeSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBackend for FakeSupervisor {
    fn run<'a>(
        &'a mut self,
        argv: &'a [String],
        timeout: Option<Duration>,
    ) -> Pin<Box<dyn Future<Output = Result<RunResult>> + Send + 'a>> {
        self.calls.lock().unwrap().push((argv.to_vec(), timeout));
        if let Some(hook) = self.hook.as_mut() {
            hook(argv);
        }
        let result = self.script.pop_front().unwrap_or_default();

        Box::pin(async move { Ok(result) })
    }
}
