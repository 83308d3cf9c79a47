//! # LaTeX Reporting Module / LaTeX 报告模块
//!
//! Writes one `booktabs` table per family to `results_{family}.tex`, ready to
//! be `\input` into a paper. Tables of metrics other than `time` go to
//! `results_{family}_{metric}.tex`. Undefined cells are printed as `--`.
//!
//! 为每个家族写出一张 `booktabs` 表格到 `results_{family}.tex`，可直接 `\input` 到论文中。
//! 非 `time` 指标的表格写入 `results_{family}_{metric}.tex`。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::models::TIME_KEY;
use crate::core::stats::{PLACEHOLDER, fmt_value};
use crate::reporting::analysis::FamilyTable;

/// Renders a family table as a complete `tabular` environment.
pub fn render_family(table: &FamilyTable) -> String {
    let with_states = table.rows.iter().any(|r| r.states.is_some());
    let with_blocks = table.rows.iter().any(|r| r.blocks.is_some());

    let mut spec = String::from("l");
    let mut header = vec![escape("Model")];
    if with_states {
        spec.push('r');
        header.push("States".to_string());
    }
    if with_blocks {
        spec.push('r');
        header.push("Blocks".to_string());
    }
    for column in &table.columns {
        spec.push('r');
        header.push(escape(column));
    }
    for label in &table.speedups {
        spec.push('r');
        header.push(escape(label));
    }

    let mut out = String::new();
    out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", spec));
    out.push_str("\\toprule\n");
    out.push_str(&header.join(" & "));
    out.push_str(" \\\\\n\\midrule\n");

    for row in &table.rows {
        let mut cells = vec![escape(&row.model)];
        if with_states {
            cells.push(row.states.map_or(PLACEHOLDER.to_string(), |n| n.to_string()));
        }
        if with_blocks {
            cells.push(row.blocks.map_or(PLACEHOLDER.to_string(), |n| n.to_string()));
        }
        for cell in &row.cells {
            cells.push(match cell {
                Some(cell) if cell.value.count == 0 && cell.timeouts > 0 => "T/O".to_string(),
                Some(cell) => fmt_value(Some(cell.value.mean)),
                None => PLACEHOLDER.to_string(),
            });
        }
        for speedup in &row.speedups {
            cells.push(fmt_value(*speedup));
        }
        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
    }

    out.push_str("\\bottomrule\n\\end{tabular}\n");
    out
}

/// Writes `results_{family}.tex` for every table into `dir` and returns the written paths.
/// 将每张表写入 `dir` 下的 `results_{family}.tex`，并返回写入的路径。
pub fn write_tables(dir: &Path, tables: &[FamilyTable]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create LaTeX output directory: {}", dir.display()))?;
    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(file_name(table));
        fs::write(&path, render_family(table))
            .with_context(|| format!("Failed to write LaTeX table: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn file_name(table: &FamilyTable) -> String {
    if table.metric == TIME_KEY {
        format!("results_{}.tex", table.family)
    } else {
        format!("results_{}_{}.tex", table.family, table.metric)
    }
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '_' | '%' | '&' | '#' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::online_variance;
    use crate::reporting::analysis::{Cell, FamilyRow};

    #[test]
    fn renders_booktabs_with_placeholders() {
        let table = FamilyTable {
            family: "lts".into(),
            metric: "time".into(),
            columns: vec!["fr-1".into(), "fr-4".into()],
            speedups: vec!["Speedup".into()],
            phases: vec![],
            rows: vec![FamilyRow {
                model: "kanban_03".into(),
                states: Some(1024),
                blocks: None,
                cells: vec![
                    Some(Cell {
                        value: online_variance([10.0, 15.0]),
                        timeouts: 0,
                    }),
                    Some(Cell {
                        value: online_variance(std::iter::empty()),
                        timeouts: 2,
                    }),
                ],
                speedups: vec![None],
                phases: vec![],
            }],
        };

        let tex = render_family(&table);
        assert!(tex.starts_with("\\begin{tabular}{lrrrr}\n\\toprule\n"));
        assert!(tex.contains("Model & States & fr-1 & fr-4 & Speedup \\\\"));
        assert!(tex.contains("kanban\\_03 & 1024 & 12.50 & T/O & -- \\\\"));
        assert!(tex.ends_with("\\bottomrule\n\\end{tabular}\n"));
    }

    #[test]
    fn escapes_every_special_character() {
        assert_eq!(escape("a_b%c&d#e$f{g}"), "a\\_b\\%c\\&d\\#e\\$f\\{g\\}");
        assert_eq!(
            escape("x\\y^2~z"),
            "x\\textbackslash{}y\\textasciicircum{}2\\textasciitilde{}z"
        );
    }

    #[test]
    fn secondary_metrics_get_their_own_file() {
        let mut table = FamilyTable {
            family: "ctmc".into(),
            metric: "time".into(),
            columns: vec![],
            speedups: vec![],
            phases: vec![],
            rows: vec![],
        };
        assert_eq!(file_name(&table), "results_ctmc.tex");
        table.metric = "tquot".into();
        assert_eq!(file_name(&table), "results_ctmc_tquot.tex");
    }
}
