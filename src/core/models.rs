//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures shared by the store, the
//! trial runner, the scheduler and the reporting layer: the derived run status
//! of a (descriptor, iteration) pair, the metrics extracted from a tool log,
//! and the result of a full resumable scan.
//!
//! 此模块定义了存储、试验执行器、调度器和报告层共享的核心数据结构：
//! (描述符, 迭代) 对的派生运行状态、从工具日志中提取的指标，以及完整可恢复扫描的结果。

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Metric key -> value, as extracted from one tool log.
/// A completed record always carries [`TIME_KEY`].
pub type MetricsMap = BTreeMap<String, f64>;

/// The metric every completed trial must report.
pub const TIME_KEY: &str = "time";

/// The status of one (descriptor, iteration) pair.
/// It is never written to disk; it is recomputed from artifacts on every query.
/// 单个 (描述符, 迭代) 对的状态。
/// 它从不写入磁盘，每次查询时都会根据产物重新计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// No usable artifact: never attempted, interrupted, or the log did not parse.
    /// 没有可用的产物：从未尝试、被中断或日志无法解析。
    NotDone,
    /// The primary log parsed and contains a `time` metric.
    /// 主日志已解析并包含 `time` 指标。
    Done,
    /// A timeout marker records the budget that was exceeded.
    /// 超时标记记录了被超出的时间预算。
    Timeout,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::NotDone => "not done",
            RunStatus::Done => "done",
            RunStatus::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

/// The outcome of one (descriptor, iteration) pair, derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRecord {
    pub status: RunStatus,
    /// Wall time if done, timeout budget in seconds if timed out, 0 otherwise.
    /// 完成时为耗时，超时时为超时预算（秒），否则为 0。
    pub value: f64,
    /// Present only when `status` is [`RunStatus::Done`].
    pub metrics: Option<MetricsMap>,
}

impl RunRecord {
    pub fn not_done() -> Self {
        Self {
            status: RunStatus::NotDone,
            value: 0.0,
            metrics: None,
        }
    }

    /// Builds a completed record. Returns `None` when the map lacks `time`.
    pub fn done(metrics: MetricsMap) -> Option<Self> {
        let time = *metrics.get(TIME_KEY)?;
        Some(Self {
            status: RunStatus::Done,
            value: time,
            metrics: Some(metrics),
        })
    }

    pub fn timeout(seconds: u64) -> Self {
        Self {
            status: RunStatus::Timeout,
            value: seconds as f64,
            metrics: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == RunStatus::Done
    }

    /// The recorded timeout budget, if this record is a timeout.
    pub fn timeout_secs(&self) -> Option<u64> {
        match self.status {
            RunStatus::Timeout => Some(self.value as u64),
            _ => None,
        }
    }

    /// Whether running again at `timeout_secs` could change this record.
    /// Done records never change; a timeout only yields to a strictly larger budget.
    /// 以 `timeout_secs` 再次运行是否可能改变此记录。
    /// 已完成的记录永远不会改变；超时记录只会让位于严格更大的预算。
    pub fn is_pending(&self, timeout_secs: u64) -> bool {
        match self.status {
            RunStatus::NotDone => true,
            RunStatus::Done => false,
            RunStatus::Timeout => self.timeout_secs().is_some_and(|t| t < timeout_secs),
        }
    }
}

/// The result of one resumable scan over the output directory.
/// 对输出目录进行一次可恢复扫描的结果。
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepResults {
    /// Number of iteration indices fully scanned (the stopping index excluded).
    pub iterations: usize,
    /// Not-done pairs below the stopping index.
    pub not_done: usize,
    /// `(experiment name, metrics)` for every completed trial, in scan order.
    pub results: Vec<(String, MetricsMap)>,
    /// `(experiment name, seconds)` for every recorded timeout, in scan order.
    pub timeouts: Vec<(String, u64)>,
    /// Smallest iteration at which some descriptor still has work at the
    /// scanned timeout budget. Equals `iterations` when everything below the
    /// boundary is settled.
    pub next_iteration: usize,
}

impl SweepResults {
    pub fn successful(&self) -> usize {
        self.results.len()
    }

    pub fn timed_out(&self) -> usize {
        self.timeouts.len()
    }
}
