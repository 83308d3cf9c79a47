//! # Reporting Module / 报告模块
//!
//! This module turns the scanned results of a sweep into reports. The
//! [`analysis`] submodule aggregates and lays out the data; the other
//! submodules render it to the console, LaTeX tables, an HTML page or JSON.
//!
//! 此模块将扫描结果转换为报告。[`analysis`] 子模块负责汇总和布局数据，
//! 其他子模块将其渲染到控制台、LaTeX 表格、HTML 页面或 JSON。

pub mod analysis;
pub mod console;
pub mod html;
pub mod json;
pub mod latex;

// Re-export common reporting functions
pub use analysis::{Analysis, analyse};
pub use console::{print_families, print_progress, print_summary};
pub use html::generate_html_report;
pub use json::write_json_report;
pub use latex::write_tables;
