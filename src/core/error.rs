//! # Error Types / 错误类型
//!
//! Typed errors raised at the library seams. Per-trial problems that only
//! influence retry policy (unparseable logs, timeouts) are *not* errors; they
//! are encoded in [`RunStatus`](crate::core::models::RunStatus). Everything
//! here aborts the current session.
//!
//! 库边界处的类型化错误。仅影响重试策略的单次试验问题（无法解析的日志、超时）
//! 不是错误，而是编码在 `RunStatus` 中。这里的所有错误都会中止当前会话。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal outcomes of a trial. Any of these stops the whole sweep.
/// 试验的致命结果。任何一种都会停止整个扫描。
#[derive(Error, Debug)]
pub enum TrialError {
    /// The operator cancelled the session while a trial was running or settling.
    /// 操作员在试验运行或等待期间取消了会话。
    #[error("sweep interrupted by operator while running '{experiment}'")]
    Interrupted { experiment: String },

    /// The external process could not be started (missing executable, permissions, ...).
    /// 无法启动外部进程（可执行文件缺失、权限不足等）。
    #[error("failed to launch '{program}' for experiment '{experiment}': {source}")]
    Launch {
        experiment: String,
        program: String,
        #[source]
        source: io::Error,
    },

    /// The run status store could not be read.
    /// 无法读取运行状态存储。
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Artifact bookkeeping (create, delete, rename, marker write) failed.
    /// 产物文件管理（创建、删除、重命名、写入标记）失败。
    #[error("artifact operation failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while deriving a run status from on-disk artifacts.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read artifact {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("timeout marker {} does not hold an integer number of seconds: {content:?}", path.display())]
    CorruptMarker { path: PathBuf, content: String },
}

/// Catalog validation failures, reported when the descriptors are built.
/// 目录校验失败，在构建描述符时报告。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate experiment name '{0}'")]
    DuplicateName(String),

    #[error("variant '{variant}' in family '{family}' expands to an empty command")]
    EmptyCommand { family: String, variant: String },

    #[error("cannot split command template '{0}'")]
    UnbalancedQuotes(String),

    #[error("cannot expand '{template}': {reason}")]
    Expansion { template: String, reason: String },

    #[error("unknown placeholder '{placeholder}' in '{template}'")]
    UnknownPlaceholder { template: String, placeholder: String },

    #[error("template '{template}' uses {{workers}} but variant '{variant}' declares no workers")]
    MissingWorkers { template: String, variant: String },

    #[error("speedup '{label}' in family '{family}' references unknown experiment '{name}'")]
    UnknownSpeedupReference {
        family: String,
        label: String,
        name: String,
    },

    #[error("timeout must be at least one second")]
    ZeroTimeout,

    #[error("settle delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidSettle(String),

    #[error("'{0}' cannot be used in a report file name")]
    InvalidFileStem(String),
}
