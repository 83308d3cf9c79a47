//! Machine-readable dump of an [`Analysis`] for plotting scripts.
//! 供绘图脚本使用的 [`Analysis`] 机器可读导出。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::stats::Summary;
use crate::reporting::analysis::{Analysis, FamilyTable};

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub iterations: usize,
    pub successful: usize,
    pub timeouts: usize,
    pub not_done: usize,
    /// Experiment name -> metric key -> summary. Undefined values serialize as `null`.
    pub experiments: &'a BTreeMap<String, BTreeMap<String, Summary>>,
    pub timeouts_per_experiment: &'a BTreeMap<String, usize>,
    pub families: &'a [FamilyTable],
}

impl<'a> JsonReport<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Self {
            generated_at: Utc::now(),
            iterations: analysis.progress.iterations,
            successful: analysis.progress.successful(),
            timeouts: analysis.progress.timed_out(),
            not_done: analysis.progress.not_done,
            experiments: &analysis.aggregate,
            timeouts_per_experiment: &analysis.timeouts,
            families: &analysis.families,
        }
    }
}

pub fn write_json_report(analysis: &Analysis, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::new(analysis))
        .context("Failed to serialize JSON report")?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))?;
    Ok(())
}
