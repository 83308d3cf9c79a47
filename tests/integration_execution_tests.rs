//! # Trial Execution Integration Tests / 试验执行集成测试
//!
//! Runs real processes (`sh -c ...`) through `TrialRunner` and checks the
//! artifacts they leave behind.
//!
//! 通过 `TrialRunner` 运行真实进程（`sh -c ...`），并检查它们留下的产物。

#![cfg(unix)]

mod common;

use common::*;
use std::fs;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use sweep_runner::config::InterruptPolicy;
use sweep_runner::core::error::TrialError;
use sweep_runner::descriptor::ExperimentDescriptor;
use sweep_runner::execution::{TrialOutcome, TrialRunner};
use sweep_runner::models::RunStatus;
use sweep_runner::parser::LogParser;
use sweep_runner::store::{ArtifactStore, get_status, timeout_marker};

fn runner() -> TrialRunner {
    TrialRunner::new(Duration::ZERO, InterruptPolicy::Rename, CancellationToken::new())
}

#[tokio::test]
async fn completed_trial_is_recorded_and_then_skipped() {
    let dir = setup_outdir();
    let store = ArtifactStore::new(dir.path());
    let desc = finishing_descriptor("m-1", "12.50");
    let artifact = store.path_for(desc.name(), 0);

    let outcome = runner().run_experiment(&desc, 60, &artifact).await.unwrap();
    assert_eq!(outcome, TrialOutcome::Completed(12.5));
    let first = fs::read_to_string(&artifact).unwrap();

    // A second attempt must not relaunch or touch the log.
    let again = runner().run_experiment(&desc, 60, &artifact).await.unwrap();
    assert_eq!(again, TrialOutcome::Skipped(RunStatus::Done));
    assert_eq!(fs::read_to_string(&artifact).unwrap(), first);
    assert!(!timeout_marker(&artifact).exists());
}

#[tokio::test]
async fn timeout_leaves_only_marker_and_respects_budget() {
    let dir = setup_outdir();
    let desc = sh_descriptor("slow-1", "echo started; exec sleep 30");
    let artifact = dir.path().join("slow-1-0");

    let outcome = runner().run_experiment(&desc, 1, &artifact).await.unwrap();
    assert_eq!(outcome, TrialOutcome::TimedOut(1));
    assert!(!artifact.exists());
    assert_eq!(fs::read_to_string(timeout_marker(&artifact)).unwrap().trim(), "1");

    // Same budget: already known to be too small.
    let skipped = runner().run_experiment(&desc, 1, &artifact).await.unwrap();
    assert_eq!(skipped, TrialOutcome::Skipped(RunStatus::Timeout));

    // Larger budget: attempted again and recorded with the new value.
    let retried = runner().run_experiment(&desc, 2, &artifact).await.unwrap();
    assert_eq!(retried, TrialOutcome::TimedOut(2));
    assert_eq!(get_status(&desc, &artifact).unwrap().timeout_secs(), Some(2));

    // Smaller budget after a larger one: still skipped.
    let smaller = runner().run_experiment(&desc, 1, &artifact).await.unwrap();
    assert_eq!(smaller, TrialOutcome::Skipped(RunStatus::Timeout));
}

#[tokio::test]
async fn completion_after_timeout_clears_marker() {
    let dir = setup_outdir();
    let desc = finishing_descriptor("m-1", "3.0");
    let artifact = dir.path().join("m-1-0");
    fs::write(timeout_marker(&artifact), "1").unwrap();

    let outcome = runner().run_experiment(&desc, 5, &artifact).await.unwrap();
    assert_eq!(outcome, TrialOutcome::Completed(3.0));
    assert!(!timeout_marker(&artifact).exists());
}

#[tokio::test]
async fn unusable_log_is_kept_and_stays_not_done() {
    let dir = setup_outdir();
    let desc = sh_descriptor("crash-1", "echo 'segmentation fault'; exit 139");
    let artifact = dir.path().join("crash-1-0");

    let outcome = runner().run_experiment(&desc, 60, &artifact).await.unwrap();
    assert_eq!(outcome, TrialOutcome::Incomplete);
    assert!(fs::read_to_string(&artifact).unwrap().contains("segmentation fault"));
    assert_eq!(get_status(&desc, &artifact).unwrap().status, RunStatus::NotDone);
}

#[tokio::test]
async fn launch_failure_is_fatal_and_leaves_nothing() {
    let dir = setup_outdir();
    let desc = ExperimentDescriptor::new(
        "missing-1",
        vec!["/nonexistent/sweep-runner-tool".to_string()],
        LogParser::Mc,
    )
    .unwrap();
    let artifact = dir.path().join("missing-1-0");

    let err = runner().run_experiment(&desc, 60, &artifact).await.unwrap_err();
    assert!(matches!(err, TrialError::Launch { .. }));
    assert!(!artifact.exists());
    assert!(!timeout_marker(&artifact).exists());
}

#[tokio::test]
async fn interruption_moves_partial_log_aside() {
    let dir = setup_outdir();
    let desc = sh_descriptor("slow-1", "exec sleep 30");
    let artifact = dir.path().join("slow-1-0");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let runner = TrialRunner::new(Duration::ZERO, InterruptPolicy::Rename, cancel);

    let err = runner.run_experiment(&desc, 60, &artifact).await.unwrap_err();
    assert!(matches!(err, TrialError::Interrupted { .. }));
    assert!(!artifact.exists());
    assert!(dir.path().join("slow-1-0.interrupted").exists());
    assert_eq!(get_status(&desc, &artifact).unwrap().status, RunStatus::NotDone);
}

#[tokio::test]
async fn interruption_can_discard_partial_log() {
    let dir = setup_outdir();
    let desc = sh_descriptor("slow-1", "exec sleep 30");
    let artifact = dir.path().join("slow-1-0");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let runner = TrialRunner::new(Duration::ZERO, InterruptPolicy::Discard, cancel);

    let err = runner.run_experiment(&desc, 60, &artifact).await.unwrap_err();
    assert!(matches!(err, TrialError::Interrupted { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn launched_trial_is_followed_by_the_settle_pause() {
    let dir = setup_outdir();
    let desc = finishing_descriptor("m-1", "0.5");
    let artifact = dir.path().join("m-1-0");
    let settle = Duration::from_millis(300);
    let runner = TrialRunner::new(settle, InterruptPolicy::Rename, CancellationToken::new());

    let started = Instant::now();
    let outcome = runner.run_experiment(&desc, 60, &artifact).await.unwrap();
    assert_eq!(outcome, TrialOutcome::Completed(0.5));
    assert!(started.elapsed() >= settle);

    // A skipped trial launches nothing and does not pause.
    let started = Instant::now();
    let skipped = runner.run_experiment(&desc, 60, &artifact).await.unwrap();
    assert_eq!(skipped, TrialOutcome::Skipped(RunStatus::Done));
    assert!(started.elapsed() < settle);
}

#[tokio::test]
async fn cancelling_during_the_settle_pause_stops_the_sweep() {
    let dir = setup_outdir();
    let desc = finishing_descriptor("m-1", "0.5");
    let artifact = dir.path().join("m-1-0");
    let cancel = CancellationToken::new();
    let runner = TrialRunner::new(Duration::from_secs(10), InterruptPolicy::Rename, cancel.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();
    });

    let started = Instant::now();
    let err = runner.run_experiment(&desc, 60, &artifact).await.unwrap_err();
    canceller.await.unwrap();
    assert!(matches!(err, TrialError::Interrupted { .. }));
    assert!(started.elapsed() < Duration::from_secs(10));

    // The trial itself finished before the pause; its log is kept as is.
    assert_eq!(get_status(&desc, &artifact).unwrap().status, RunStatus::Done);
    assert!(!dir.path().join("m-1-0.interrupted").exists());
}
