//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Sweep Runner: the catalog
//! configuration, experiment descriptors and their log parsers, the
//! filesystem-backed run status store, single-trial execution, the resumable
//! scheduler and the streaming statistics.
//!
//! 此模块包含 Sweep Runner 的核心功能：目录配置、实验描述符及其日志解析器、
//! 基于文件系统的运行状态存储、单次试验执行、可恢复的调度器以及流式统计。

pub mod config;
pub mod descriptor;
pub mod error;
pub mod execution;
pub mod models;
pub mod parser;
pub mod scheduler;
pub mod stats;
pub mod store;

// Re-exports
pub use descriptor::ExperimentDescriptor;
pub use execution::{TrialOutcome, TrialRunner};
pub use models::{MetricsMap, RunRecord, RunStatus, SweepResults};
pub use scheduler::Engine;
