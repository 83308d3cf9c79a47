//! # Command Execution Module / 命令执行模块
//!
//! Launches an external tool with its combined stdout/stderr redirected into a
//! log file and waits for it under a wall-clock budget, racing the wait against
//! an operator cancellation token. The exit status is returned but the caller
//! decides what it means; for benchmark tools only the log content matters.
//!
//! 启动外部工具，将其合并的 stdout/stderr 重定向到日志文件，并在墙钟时间预算内等待，
//! 同时与操作员的取消令牌竞争。退出状态会被返回，但由调用者决定其含义；
//! 对于基准测试工具，只有日志内容才重要。

use std::fs::File;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// How a bounded wait ended.
/// 有界等待的结束方式。
#[derive(Debug)]
pub enum WaitOutcome {
    /// The process exited on its own. / 进程自行退出。
    Exited(ExitStatus),
    /// The budget expired and the process was killed. / 预算耗尽，进程已被终止。
    TimedOut,
    /// The operator cancelled and the process was killed. / 操作员取消，进程已被终止。
    Cancelled,
}

/// Spawns `invocation` (program first) with stdout and stderr both appended to `log`.
/// Errors here are launch failures: missing executable, permissions, and so on.
///
/// 启动 `invocation`（第一个元素为程序），stdout 和 stderr 都写入 `log`。
/// 此处的错误即为启动失败：可执行文件缺失、权限不足等。
pub fn spawn_into_log(invocation: &[String], log: File) -> io::Result<Child> {
    let (program, args) = invocation
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty invocation"))?;
    let stderr = log.try_clone()?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log))
        .stderr(Stdio::from(stderr))
        .kill_on_drop(true);
    cmd.spawn()
}

/// Waits for `child` for at most `budget`. On expiry or cancellation the child
/// is killed and reaped before returning.
pub async fn wait_bounded(
    child: &mut Child,
    budget: Duration,
    cancel: &CancellationToken,
) -> io::Result<WaitOutcome> {
    // The wait future borrows the child, so the kill happens outside the select.
    let waited = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        res = tokio::time::timeout(budget, child.wait()) => Some(res),
    };

    match waited {
        Some(Ok(status)) => Ok(WaitOutcome::Exited(status?)),
        Some(Err(_elapsed)) => {
            child.kill().await?;
            Ok(WaitOutcome::TimedOut)
        }
        None => {
            child.kill().await?;
            Ok(WaitOutcome::Cancelled)
        }
    }
}
