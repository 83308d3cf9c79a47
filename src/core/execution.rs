//! # Trial Execution Module / 试验执行模块
//!
//! This module runs one trial: a single (descriptor, iteration) attempt bounded
//! by a wall-clock budget. Running is idempotent. A trial that is already done,
//! or that already timed out at this budget or a larger one, is skipped without
//! touching the filesystem or spawning anything.
//!
//! 此模块运行一次试验：在墙钟时间预算内对单个 (描述符, 迭代) 的一次尝试。
//! 运行是幂等的：已完成的试验，或已在相同或更大预算下超时的试验，
//! 会被直接跳过，不会触碰文件系统，也不会启动任何进程。

use colored::*;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::config::InterruptPolicy;
use crate::core::descriptor::ExperimentDescriptor;
use crate::core::error::TrialError;
use crate::core::models::RunStatus;
use crate::core::store::{clear_artifacts, get_status, interrupted_path, write_timeout_marker};
use crate::infra::command::{WaitOutcome, spawn_into_log, wait_bounded};
use crate::infra::fs::remove_if_exists;
use crate::infra::t;

/// What a call to [`TrialRunner::run_experiment`] did.
/// 一次 [`TrialRunner::run_experiment`] 调用所做的事情。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialOutcome {
    /// Nothing to do; the pair was already done or timeout-capped.
    /// 无需执行；该对已完成或已达到超时上限。
    Skipped(RunStatus),
    /// The tool ran and its log parsed; carries the reported time.
    /// 工具已运行且日志可解析；携带报告的时间。
    Completed(f64),
    /// The tool was killed after the given budget.
    /// 工具在给定预算后被终止。
    TimedOut(u64),
    /// The tool exited but its log did not prove completion. Retried later.
    /// 工具已退出但日志不能证明完成，稍后重试。
    Incomplete,
}

impl TrialOutcome {
    /// Whether a process was launched for this trial.
    pub fn ran(&self) -> bool {
        !matches!(self, TrialOutcome::Skipped(_))
    }
}

/// Executes trials one at a time and settles the host between them.
#[derive(Debug, Clone)]
pub struct TrialRunner {
    settle_delay: Duration,
    on_interrupt: InterruptPolicy,
    cancel: CancellationToken,
}

impl TrialRunner {
    pub fn new(
        settle_delay: Duration,
        on_interrupt: InterruptPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            settle_delay,
            on_interrupt,
            cancel,
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Runs `descriptor` once with its output in `artifact`, unless the stored
    /// status already settles the question at `timeout_secs`.
    ///
    /// Returns an error only for session-fatal conditions: operator
    /// interruption, launch failure, or an unusable output directory.
    ///
    /// 以 `artifact` 作为输出运行 `descriptor` 一次，除非已存储的状态已经决定了结果。
    /// 仅在会话致命的情况下返回错误：操作员中断、启动失败或输出目录不可用。
    pub async fn run_experiment(
        &self,
        descriptor: &ExperimentDescriptor,
        timeout_secs: u64,
        artifact: &Path,
    ) -> Result<TrialOutcome, TrialError> {
        let record = get_status(descriptor, artifact)?;
        if !record.is_pending(timeout_secs) {
            return Ok(TrialOutcome::Skipped(record.status));
        }

        clear_artifacts(artifact).map_err(|e| io_error(artifact, e))?;

        print!(
            "{} {} ",
            t!("run.performing", name = descriptor.name()).blue(),
            format!("[{}]", descriptor.command_line()).dimmed()
        );
        io::stdout().flush().ok();

        let outcome = self.launch(descriptor, timeout_secs, artifact).await?;
        self.settle(descriptor).await?;
        Ok(outcome)
    }

    async fn launch(
        &self,
        descriptor: &ExperimentDescriptor,
        timeout_secs: u64,
        artifact: &Path,
    ) -> Result<TrialOutcome, TrialError> {
        let log = File::create(artifact).map_err(|e| io_error(artifact, e))?;

        let mut child = match spawn_into_log(descriptor.invocation(), log) {
            Ok(child) => child,
            Err(source) => {
                remove_if_exists(artifact).map_err(|e| io_error(artifact, e))?;
                println!("{}", t!("run.os_failure").red().bold());
                return Err(TrialError::Launch {
                    experiment: descriptor.name().to_string(),
                    program: descriptor.program().to_string(),
                    source,
                });
            }
        };

        let waited = wait_bounded(&mut child, Duration::from_secs(timeout_secs), &self.cancel).await;
        let outcome = match waited {
            Ok(outcome) => outcome,
            Err(e) => {
                remove_if_exists(artifact).ok();
                println!("{}", t!("run.os_failure").red().bold());
                return Err(io_error(artifact, e));
            }
        };

        match outcome {
            WaitOutcome::Cancelled => {
                self.discard_interrupted(artifact)?;
                println!("{}", t!("run.interrupted").yellow().bold());
                Err(TrialError::Interrupted {
                    experiment: descriptor.name().to_string(),
                })
            }
            WaitOutcome::TimedOut => {
                // The primary log goes first so a crash in between never leaves both files.
                remove_if_exists(artifact).map_err(|e| io_error(artifact, e))?;
                write_timeout_marker(artifact, timeout_secs).map_err(|e| io_error(artifact, e))?;
                println!("{}", t!("run.timeout").red());
                Ok(TrialOutcome::TimedOut(timeout_secs))
            }
            WaitOutcome::Exited(_) => {
                let record = get_status(descriptor, artifact)?;
                if record.is_done() {
                    println!("{}", t!("run.done", time = record.value).green());
                    Ok(TrialOutcome::Completed(record.value))
                } else {
                    println!("{}", t!("run.not_done").yellow());
                    Ok(TrialOutcome::Incomplete)
                }
            }
        }
    }

    fn discard_interrupted(&self, artifact: &Path) -> Result<(), TrialError> {
        let result = match self.on_interrupt {
            InterruptPolicy::Rename => std::fs::rename(artifact, interrupted_path(artifact)),
            InterruptPolicy::Discard => remove_if_exists(artifact).map(|_| ()),
        };
        result.map_err(|e| io_error(artifact, e))
    }

    /// Lets the host breathe between resource-intensive invocations.
    async fn settle(&self, descriptor: &ExperimentDescriptor) -> Result<(), TrialError> {
        if self.settle_delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TrialError::Interrupted {
                experiment: descriptor.name().to_string(),
            }),
            _ = tokio::time::sleep(self.settle_delay) => Ok(()),
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> TrialError {
    TrialError::Io {
        path: path.to_path_buf(),
        source,
    }
}
