mod common;
use crate::common::builders::ConfigBuilder;
use crate::common::fake_supervisor::FakeSupervisor;
use crate::common::{argv, init_tracing};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::TempDir;

use cronwrap::config::Config;
use cronwrap::engine::{Orchestrator, Outcome, Phase};
use cronwrap::errors::{CronwrapError, Result};
use cronwrap::exec::ProcessSupervisor;
use cronwrap::fs::RealFileSystem;
use cronwrap::job::{JobDir, JobId};
use cronwrap::lock::{guard_for, FlockGuard, LockAttempt, OverlapGuard};
use cronwrap::types::LockBackendKind;

const JOB: &[&str] = &["./tester", "/tmp/state"];

async fn run_with(config: Config, fake: FakeSupervisor) -> Result<Outcome> {
    let guard = guard_for(config.lock_backend);
    Orchestrator::new(config, Arc::new(RealFileSystem), guard, fake)
        .run()
        .await
}

fn job_dir(tmp: &TempDir) -> JobDir {
    JobDir::at(tmp.path(), &JobId::from_argv(&argv(JOB)))
}

fn failcount(tmp: &TempDir) -> String {
    std::fs::read_to_string(job_dir(tmp).failcount_file()).unwrap()
}

fn emitted(outcome: &Outcome) -> String {
    let mut buf = Vec::new();
    outcome.emit(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[tokio::test]
async fn test_output_passes_through_without_suppression() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).build();

    let fail = run_with(config.clone(), FakeSupervisor::new().then_exit(2, "tester is failing\n"))
        .await
        .unwrap();
    assert_eq!(fail.process_exit_code(), 2);
    assert_eq!(emitted(&fail), "tester is failing\n");
    assert_eq!(fail.failure_count, 1);

    let ok = run_with(config, FakeSupervisor::new().then_exit(0, "tester is succeeding\n"))
        .await
        .unwrap();
    assert_eq!(ok.process_exit_code(), 0);
    assert_eq!(emitted(&ok), "tester is succeeding\n");
    assert_eq!(failcount(&tmp), "0");
}

#[tokio::test]
async fn test_failures_suppressed_until_threshold() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).suppress(3).build();

    let mut seen = Vec::new();
    for _ in 0..4 {
        let outcome = run_with(
            config.clone(),
            FakeSupervisor::new().then_exit(1, "tester is failing\n"),
        )
        .await
        .unwrap();
        seen.push((emitted(&outcome), outcome.process_exit_code()));
    }

    assert_eq!(
        seen,
        vec![
            (String::new(), 0),
            (String::new(), 0),
            ("tester is failing\n".to_string(), 1),
            ("tester is failing\n".to_string(), 1),
        ]
    );
    assert_eq!(failcount(&tmp), "4");
}

#[tokio::test]
async fn test_success_resets_streak_and_suppression_resumes() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).suppress(2).build();

    for _ in 0..2 {
        run_with(config.clone(), FakeSupervisor::new().then_exit(1, "boom\n"))
            .await
            .unwrap();
    }
    assert_eq!(failcount(&tmp), "2");

    let ok = run_with(config.clone(), FakeSupervisor::new().then_exit(0, "fine\n"))
        .await
        .unwrap();
    assert!(ok.suppressed);
    assert_eq!(emitted(&ok), "");
    assert_eq!(failcount(&tmp), "0");

    let next = run_with(config, FakeSupervisor::new().then_exit(1, "boom\n"))
        .await
        .unwrap();
    assert!(next.suppressed);
    assert_eq!(next.process_exit_code(), 0);
    assert_eq!(next.failure_count, 1);
}

#[tokio::test]
async fn test_first_success_is_suppressed_when_enabled() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).suppress(1).build();

    let outcome = run_with(config, FakeSupervisor::new().then_exit(0, "all good\n"))
        .await
        .unwrap();

    assert!(outcome.suppressed);
    assert_eq!(outcome.process_exit_code(), 0);
    assert_eq!(emitted(&outcome), "");
}

#[tokio::test]
async fn test_timeout_counts_as_failure() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB)
        .timeout(Duration::from_secs(5))
        .build();
    let fake = FakeSupervisor::new().then_time_out();
    let calls = fake.calls();

    let outcome = run_with(config, fake).await.unwrap();

    assert!(outcome.timed_out);
    assert_eq!(outcome.process_exit_code(), cronwrap::types::TIMEOUT_EXIT_CODE);
    assert_eq!(outcome.failure_count, 1);
    assert_eq!(calls.lock().unwrap()[0].1, Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_phases_in_order_with_overlap() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).overlap(true).build();

    let outcome = run_with(config, FakeSupervisor::new().then_exit(0, ""))
        .await
        .unwrap();

    assert_eq!(
        outcome.phases,
        vec![
            Phase::Init,
            Phase::Identified,
            Phase::LockAcquired,
            Phase::Supervised,
            Phase::LockReleased,
            Phase::LedgerUpdated,
            Phase::Terminal,
        ]
    );
    assert!(!job_dir(&tmp).pid_file().exists());
}

#[tokio::test]
async fn test_phases_without_options() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).build();

    let outcome = run_with(config, FakeSupervisor::new()).await.unwrap();

    assert_eq!(
        outcome.phases,
        vec![
            Phase::Init,
            Phase::Identified,
            Phase::Supervised,
            Phase::LedgerUpdated,
            Phase::Terminal,
        ]
    );
}

#[tokio::test]
async fn test_jitter_phase_runs_before_lock() {
    let tmp = TempDir::new().unwrap();
    // Sub-second bound: no actual delay, but the phase is still visited.
    let config = ConfigBuilder::new(tmp.path(), JOB)
        .jitter(Duration::from_millis(500))
        .overlap(true)
        .build();

    let outcome = run_with(config, FakeSupervisor::new()).await.unwrap();

    assert_eq!(&outcome.phases[..4], &[
        Phase::Init,
        Phase::Identified,
        Phase::Jittered,
        Phase::LockAcquired,
    ]);
}

#[tokio::test]
async fn test_lock_is_held_while_job_runs() {
    let tmp = TempDir::new().unwrap();
    let dir = job_dir(&tmp);
    let config = ConfigBuilder::new(tmp.path(), JOB).overlap(true).build();

    let observed = Arc::new(Mutex::new(None));
    let observed_in_hook = Arc::clone(&observed);
    let probe_dir = dir.clone();
    let fake = FakeSupervisor::new().with_hook(move |_| {
        let busy = matches!(
            FlockGuard.try_acquire(&probe_dir).unwrap(),
            LockAttempt::Busy
        );
        *observed_in_hook.lock().unwrap() = Some(busy);
    });

    run_with(config, fake).await.unwrap();

    assert_eq!(*observed.lock().unwrap(), Some(true));
}

#[tokio::test]
async fn test_busy_lock_aborts_without_running_or_touching_ledger() {
    let tmp = TempDir::new().unwrap();
    let cmd = argv(JOB);
    let dir = JobDir::ensure(&RealFileSystem, tmp.path(), &JobId::from_argv(&cmd), &cmd).unwrap();
    std::fs::write(dir.failcount_file(), "5").unwrap();

    let LockAttempt::Acquired(held) = FlockGuard.try_acquire(&dir).unwrap() else {
        panic!("test could not take the lock");
    };

    let config = ConfigBuilder::new(tmp.path(), JOB).overlap(true).build();
    let fake = FakeSupervisor::new().then_exit(1, "should not run\n");
    let calls = fake.calls();

    let err = run_with(config, fake).await.unwrap_err();

    assert!(matches!(err, CronwrapError::JobBusy { .. }), "got {err:?}");
    assert_eq!(err.to_string(), "Job is already running");
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(failcount(&tmp), "5");

    held.release().unwrap();
}

#[tokio::test]
async fn test_directory_backend_busy() {
    let tmp = TempDir::new().unwrap();
    let dir = job_dir(&tmp);
    std::fs::create_dir_all(dir.lock_dir()).unwrap();

    let config = ConfigBuilder::new(tmp.path(), JOB)
        .overlap(true)
        .lock_backend(LockBackendKind::Directory)
        .build();

    let err = run_with(config, FakeSupervisor::new()).await.unwrap_err();
    assert!(matches!(err, CronwrapError::JobBusy { .. }));
}

#[tokio::test]
async fn test_spawn_failure_releases_lock_and_skips_ledger() {
    let tmp = TempDir::new().unwrap();
    let command = &["/nonexistent/cronwrap-job"];
    let config = ConfigBuilder::new(tmp.path(), command).overlap(true).build();
    let dir = JobDir::at(tmp.path(), &JobId::from_argv(&argv(command)));

    let guard = guard_for(config.lock_backend);
    let err = Orchestrator::new(
        config,
        Arc::new(RealFileSystem),
        guard,
        ProcessSupervisor::default(),
    )
    .run()
    .await
    .unwrap_err();

    assert!(matches!(err, CronwrapError::Spawn { .. }), "got {err:?}");
    assert!(!dir.pid_file().exists());
    assert!(!dir.failcount_file().exists());
}

#[tokio::test]
async fn test_real_job_through_orchestrator() {
    let tmp = TempDir::new().unwrap();
    let command = &["sh", "-c", "echo from job; exit 7"];
    let config = ConfigBuilder::new(tmp.path(), command).build();

    let guard = guard_for(config.lock_backend);
    let outcome = Orchestrator::new(
        config,
        Arc::new(RealFileSystem),
        guard,
        ProcessSupervisor::default(),
    )
    .run()
    .await
    .unwrap();

    assert_eq!(outcome.process_exit_code(), 7);
    assert_eq!(emitted(&outcome), "from job\n");
}

struct ClosedPipe;

impl std::io::Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }
}

#[tokio::test]
async fn test_broken_stdout_keeps_job_status() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).build();

    let outcome = run_with(config, FakeSupervisor::new().then_exit(3, "report\n"))
        .await
        .unwrap();

    assert_eq!(cronwrap::deliver(&outcome, &mut ClosedPipe), 3);
    assert_eq!(failcount(&tmp), "1");
}

#[tokio::test]
async fn test_deliver_writes_unsuppressed_output() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigBuilder::new(tmp.path(), JOB).build();

    let outcome = run_with(config, FakeSupervisor::new().then_exit(0, "report\n"))
        .await
        .unwrap();

    let mut buf = Vec::new();
    assert_eq!(cronwrap::deliver(&outcome, &mut buf), 0);
    assert_eq!(buf, b"report\n");
}
