//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the sweep progress, one line of statistics per experiment, and the
//! per-family tables with speedups and phase breakdowns.
//!
//! 打印扫描进度、每个实验一行的统计数据，以及包含加速比和阶段分解的家族表格。

use colored::*;

use crate::core::models::{SweepResults, TIME_KEY};
use crate::core::stats::fmt_value;
use crate::infra::t;
use crate::reporting::analysis::{Analysis, FamilyTable};

/// Prints the progress line shared by `run` and `report`.
///
/// ```text
/// Progress: 3 iterations, 41 successful, 1 timeouts, 2 not done
/// ```
pub fn print_progress(progress: &SweepResults, locale: &str) {
    println!(
        "{}",
        t!(
            "run.progress",
            locale = locale,
            iterations = progress.iterations,
            successful = progress.successful(),
            timeouts = progress.timed_out(),
            not_done = progress.not_done
        )
        .cyan()
    );
}

/// Prints one line per experiment: runs, mean and standard deviation of `time`, timeouts.
/// 每个实验打印一行：运行次数、`time` 的均值和标准差、超时次数。
pub fn print_summary(analysis: &Analysis, locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());
    println!(
        "  {:<40} {:>5} {:>10} {:>10} {:>8}",
        t!("report.header.experiment", locale = locale),
        t!("report.header.runs", locale = locale),
        t!("report.header.mean", locale = locale),
        t!("report.header.stddev", locale = locale),
        t!("report.header.timeouts", locale = locale),
    );

    let mut names: Vec<&String> = analysis.aggregate.keys().chain(analysis.timeouts.keys()).collect();
    names.sort();
    names.dedup();

    for name in names {
        let time = analysis
            .aggregate
            .get(name)
            .and_then(|m| m.get(TIME_KEY))
            .copied();
        let timeouts = analysis.timeouts.get(name).copied().unwrap_or(0);
        let (runs, mean, std_dev) = match time {
            Some(s) => (s.count, Some(s.mean), Some(s.std_dev())),
            None => (0, None, None),
        };
        let timeouts_str = if timeouts > 0 {
            timeouts.to_string().red()
        } else {
            timeouts.to_string().normal()
        };
        println!(
            "  {:<40} {:>5} {:>10} {:>10} {:>8}",
            name,
            runs,
            fmt_value(mean),
            fmt_value(std_dev),
            timeouts_str
        );
    }
}

/// Prints every family table.
pub fn print_families(analysis: &Analysis, locale: &str) {
    for table in &analysis.families {
        print_family(table, locale);
    }
}

fn print_family(table: &FamilyTable, locale: &str) {
    println!(
        "\n{}",
        t!(
            "report.family_banner",
            locale = locale,
            family = &table.family,
            metric = &table.metric
        )
            .bold()
            .underline()
    );

    let mut header = format!("  {:<24}", t!("report.header.model", locale = locale));
    for column in &table.columns {
        header.push_str(&format!(" {:>16}", column));
    }
    for label in &table.speedups {
        header.push_str(&format!(" {:>10}", label));
    }
    println!("{}", header.bold());

    for row in &table.rows {
        let mut line = format!("  {:<24}", row.model);
        for cell in &row.cells {
            // mean (runs)
            let value = match cell {
                Some(cell) if cell.value.count == 0 && cell.timeouts > 0 => "T/O".to_string(),
                Some(cell) => format!("{} ({})", fmt_value(Some(cell.value.mean)), cell.value.count),
                None => String::new(),
            };
            line.push_str(&format!(" {:>16}", value));
        }
        for speedup in &row.speedups {
            line.push_str(&format!(" {:>10}", fmt_value(*speedup).green()));
        }
        println!("{}", line);
    }

    if table.phases.is_empty() {
        return;
    }
    println!("  {}", t!("report.phase_banner", locale = locale).dimmed());
    for row in &table.rows {
        for (phase, per_column) in table.phases.iter().zip(&row.phases) {
            let mut line = format!("  {:<24}", format!("{} {}", row.model, phase));
            for cell in per_column {
                let value = match cell {
                    Some(cell) => match cell.percent {
                        Some(p) => format!("{} ({:.0}%)", fmt_value(Some(cell.mean)), p),
                        None => fmt_value(None),
                    },
                    None => String::new(),
                };
                line.push_str(&format!(" {:>16}", value));
            }
            println!("{}", line.dimmed());
        }
    }
}
