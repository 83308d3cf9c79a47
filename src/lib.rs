//! # Sweep Runner Library / Sweep Runner 库
//!
//! This library provides the core functionality for the Sweep Runner tool,
//! a resumable, configuration-driven benchmark harness that repeatedly times
//! external analysis tools and aggregates the measurements.
//!
//! 此库为 Sweep Runner 工具提供核心功能，
//! 这是一个可恢复的、配置驱动的基准测试工具，会反复计时外部分析工具并汇总测量结果。
//!
//! ## Modules / 模块
//!
//! - `core` - Experiment descriptors, run status store, trial execution, scheduling and statistics
//! - `infra` - Infrastructure services like process spawning and artifact file operations
//! - `reporting` - Console, LaTeX, HTML and JSON reports over aggregated results
//! - `cli` - Command-line interface
//! - `commands` - Implementations of the `run`, `report` and `init` commands
//!
//! - `core` - 实验描述符、运行状态存储、试验执行、调度与统计
//! - `infra` - 基础设施服务，如进程启动和产物文件操作
//! - `reporting` - 基于汇总结果的控制台、LaTeX、HTML 和 JSON 报告
//! - `cli` - 命令行接口
//! - `commands` - `run`、`report` 和 `init` 命令的实现

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;
pub mod commands;

// Re-export commonly used items
pub use core::config;
pub use core::descriptor;
pub use core::execution;
pub use core::models;
pub use core::parser;
pub use core::scheduler;
pub use core::stats;
pub use core::store;
pub use rust_i18n::t;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    set_language(&locale);
}

/// Sets the active locale, falling back from the full tag to the language
/// code and finally to "en" when no translation file matches.
/// 设置当前语言，若没有匹配的翻译文件则依次回退到语言代码和 "en"。
pub fn set_language(locale: &str) {
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale) {
        locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
