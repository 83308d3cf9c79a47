//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Sweep Runner,
//! including bounded process execution, artifact file operations and i18n support.
//!
//! 此模块为 Sweep Runner 提供基础设施服务，
//! 包括有界进程执行、产物文件操作和国际化支持。

pub mod command;
pub mod fs;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
