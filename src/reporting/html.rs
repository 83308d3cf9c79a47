//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML page from an [`Analysis`]: the
//! sweep progress, per-experiment statistics and one table per family.
//!
//! 此模块从 [`Analysis`] 渲染一个独立的 HTML 页面：扫描进度、每个实验的统计数据以及每个家族一张表。

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::core::models::TIME_KEY;
use crate::core::stats::fmt_value;
use crate::infra::t;
use crate::reporting::analysis::{Analysis, FamilyTable};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Writes the HTML report to `output_path`.
///
/// 将 HTML 报告写入 `output_path`。
///
/// # Errors / 错误
/// Fails if the file cannot be written.
/// 如果无法写入文件则失败。
pub fn generate_html_report(analysis: &Analysis, output_path: &Path, locale: &str) -> Result<()> {
    let html = render(analysis, locale);
    fs::write(output_path, html)
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    Ok(())
}

/// Renders the report page.
pub fn render(analysis: &Analysis, locale: &str) -> String {
    let progress = &analysis.progress;

    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html><head><meta charset='utf-8'><title>{}</title>",
        t!("html_report.title", locale = locale)
    ));
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style>");
    html.push_str("</head><body>");
    html.push_str(&format!(
        "<h1>{}</h1>",
        t!("html_report.main_header", locale = locale)
    ));

    html.push_str("<div class='summary-container'>");
    for (count, class, key) in [
        (progress.iterations, "", "html_report.summary.iterations"),
        (progress.successful(), "done-text", "html_report.summary.successful"),
        (progress.timed_out(), "timeout-text", "html_report.summary.timeouts"),
        (progress.not_done, "pending-text", "html_report.summary.not_done"),
    ] {
        html.push_str(&format!(
            "<div class='summary-item'><span class='count {}'>{}</span><span class='label'>{}</span></div>",
            class,
            count,
            t!(key, locale = locale)
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        "<h2>{}</h2>",
        t!("report.summary_banner", locale = locale)
    ));
    html.push_str("<table><thead><tr>");
    for key in [
        "report.header.experiment",
        "report.header.metric",
        "report.header.runs",
        "report.header.mean",
        "report.header.stddev",
        "report.header.timeouts",
    ] {
        html.push_str(&format!("<th>{}</th>", t!(key, locale = locale)));
    }
    html.push_str("</tr></thead><tbody>");

    let mut names: Vec<&String> = analysis
        .aggregate
        .keys()
        .chain(analysis.timeouts.keys())
        .collect();
    names.sort();
    names.dedup();
    for name in names {
        let timeouts = analysis.timeouts.get(name).copied().unwrap_or(0);
        let class = if timeouts > 0 { "timeout" } else { "num" };
        let metrics = analysis.aggregate.get(name);

        // `time` first, then the secondary metrics in key order.
        let mut keys: Vec<&str> = vec![TIME_KEY];
        if let Some(metrics) = metrics {
            keys.extend(metrics.keys().map(String::as_str).filter(|k| *k != TIME_KEY));
        }

        for key in keys {
            let summary = metrics.and_then(|m| m.get(key));
            html.push_str("<tr>");
            if key == TIME_KEY {
                html.push_str(&format!("<td>{}</td>", escape_html(name)));
            } else {
                html.push_str("<td></td>");
            }
            html.push_str(&format!("<td>{}</td>", escape_html(key)));
            html.push_str(&format!(
                "<td class='num'>{}</td>",
                summary.map_or(0, |s| s.count)
            ));
            html.push_str(&format!(
                "<td class='num'>{}</td>",
                fmt_value(summary.map(|s| s.mean))
            ));
            html.push_str(&format!(
                "<td class='num'>{}</td>",
                fmt_value(summary.map(|s| s.std_dev()))
            ));
            if key == TIME_KEY {
                html.push_str(&format!("<td class='{}'>{}</td>", class, timeouts));
            } else {
                html.push_str("<td></td>");
            }
            html.push_str("</tr>");
        }
    }
    html.push_str("</tbody></table>");

    for table in &analysis.families {
        push_family(&mut html, table, locale);
    }

    html.push_str("</body></html>");
    html
}

fn push_family(html: &mut String, table: &FamilyTable, locale: &str) {
    html.push_str(&format!(
        "<h2>{}</h2>",
        escape_html(&t!(
            "report.family_banner",
            locale = locale,
            family = &table.family,
            metric = &table.metric
        ))
    ));
    html.push_str("<table><thead><tr>");
    html.push_str(&format!(
        "<th>{}</th>",
        t!("report.header.model", locale = locale)
    ));
    for column in table.columns.iter().chain(&table.speedups) {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        html.push_str("<tr>");
        html.push_str(&format!("<td>{}</td>", escape_html(&row.model)));
        for cell in &row.cells {
            match cell {
                Some(cell) if cell.value.count == 0 && cell.timeouts > 0 => {
                    html.push_str("<td class='timeout'>T/O</td>")
                }
                Some(cell) => html.push_str(&format!(
                    "<td class='num' title='n={}'>{}</td>",
                    cell.value.count,
                    fmt_value(Some(cell.value.mean))
                )),
                None => html.push_str("<td></td>"),
            }
        }
        for speedup in &row.speedups {
            html.push_str(&format!("<td class='num'>{}</td>", fmt_value(*speedup)));
        }
        html.push_str("</tr>");

        for (phase, per_column) in table.phases.iter().zip(&row.phases) {
            html.push_str("<tr class='phase'>");
            html.push_str(&format!("<td>{}</td>", escape_html(phase)));
            for cell in per_column {
                let value = match cell {
                    Some(cell) => match cell.percent {
                        Some(p) => format!("{} ({:.0}%)", fmt_value(Some(cell.mean)), p),
                        None => fmt_value(None),
                    },
                    None => String::new(),
                };
                html.push_str(&format!("<td class='num'>{}</td>", value));
            }
            for _ in &table.speedups {
                html.push_str("<td></td>");
            }
            html.push_str("</tr>");
        }
    }
    html.push_str("</tbody></table>");
}

/// Simple HTML escape function to replace special characters with their HTML entities
/// 简单的 HTML 转义函数，用 HTML 实体替换特殊字符
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
