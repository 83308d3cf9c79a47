//! # Family Analysis Module / 家族分析模块
//!
//! Turns the flat list of completed trials into tables: one per catalog family
//! and tabulated metric, with a row per model and a column per tool variant,
//! plus the configured speedup ratios. The `time` table also carries the phase
//! breakdowns. The renderers in this module's siblings only format these tables.
//!
//! 将已完成试验的扁平列表转换为表格：每个目录家族的每个指标一张，每个模型一行，每个工具变体一列，
//! 再加上配置的加速比。`time` 表还包含阶段分解。同级模块中的渲染器只负责格式化这些表。

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::config::{Catalog, FamilySpec};
use crate::core::descriptor::{ExperimentDescriptor, speedup_name};
use crate::core::models::{SweepResults, TIME_KEY};
use crate::core::stats::{Aggregate, Summary, aggregate, online_variance, ratio};

/// Statistics of the table's metric for one experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub value: Summary,
    pub timeouts: usize,
}

impl Cell {
    fn empty() -> Self {
        Self {
            value: online_variance(std::iter::empty()),
            timeouts: 0,
        }
    }
}

/// Mean of one phase metric and its share of the mean total time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseCell {
    pub mean: f64,
    /// Percentage of `time`, `None` when undefined.
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyRow {
    pub model: String,
    pub states: Option<u64>,
    pub blocks: Option<u64>,
    /// One entry per column of [`FamilyTable::columns`]; `None` if the variant skips this model.
    pub cells: Vec<Option<Cell>>,
    /// One entry per [`FamilyTable::speedups`].
    pub speedups: Vec<Option<f64>>,
    /// `phases[p][c]`: phase `p` of column `c`.
    pub phases: Vec<Vec<Option<PhaseCell>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyTable {
    pub family: String,
    /// Metric key shown in the cells and compared by the speedups.
    pub metric: String,
    pub columns: Vec<String>,
    pub speedups: Vec<String>,
    pub phases: Vec<String>,
    pub rows: Vec<FamilyRow>,
}

/// Everything the renderers need from one scan.
/// 渲染器从一次扫描中需要的全部内容。
#[derive(Debug, Clone)]
pub struct Analysis {
    pub progress: SweepResults,
    pub aggregate: Aggregate,
    /// Experiment name -> number of recorded timeouts.
    pub timeouts: BTreeMap<String, usize>,
    pub families: Vec<FamilyTable>,
}

/// Aggregates a scan and lays it out per family.
pub fn analyse(
    catalog: &Catalog,
    descriptors: &[ExperimentDescriptor],
    progress: SweepResults,
) -> Analysis {
    let aggregate = aggregate(&progress.results);
    let mut timeouts: BTreeMap<String, usize> = BTreeMap::new();
    for (name, _) in &progress.timeouts {
        *timeouts.entry(name.clone()).or_default() += 1;
    }

    let families = catalog
        .families
        .iter()
        .flat_map(|family| {
            family
                .metrics
                .iter()
                .map(|metric| family_table(family, metric, descriptors, &aggregate, &timeouts))
                .collect::<Vec<_>>()
        })
        .collect();

    Analysis {
        progress,
        aggregate,
        timeouts,
        families,
    }
}

fn family_table(
    family: &FamilySpec,
    metric: &str,
    descriptors: &[ExperimentDescriptor],
    aggregate: &Aggregate,
    timeouts: &BTreeMap<String, usize>,
) -> FamilyTable {
    let members: Vec<_> = descriptors
        .iter()
        .filter_map(|d| d.origin().filter(|o| o.family == family.name).map(|o| (d.name(), o)))
        .collect();

    let mut columns: Vec<String> = Vec::new();
    for (_, origin) in &members {
        if !columns.contains(&origin.column) {
            columns.push(origin.column.clone());
        }
    }

    let mean_of = |name: &str, key: &str| -> f64 {
        aggregate
            .get(name)
            .and_then(|m| m.get(key))
            .map_or(f64::NAN, |s| s.mean)
    };

    // Phases are shares of `time`, so only the `time` table breaks them down.
    let phases: &[String] = if metric == TIME_KEY { &family.phases } else { &[] };

    let mut models: Vec<_> = family.models.iter().collect();
    models.sort_by(|a, b| a.name.cmp(&b.name));

    let rows = models
        .into_iter()
        .map(|model| {
            let names: Vec<Option<&str>> = columns
                .iter()
                .map(|column| {
                    members
                        .iter()
                        .find(|(_, o)| o.model == model.name && &o.column == column)
                        .map(|(name, _)| *name)
                })
                .collect();

            let cells = names
                .iter()
                .map(|name| {
                    name.map(|name| {
                        let mut cell = Cell::empty();
                        if let Some(value) = aggregate.get(name).and_then(|m| m.get(metric)) {
                            cell.value = *value;
                        }
                        cell.timeouts = timeouts.get(name).copied().unwrap_or(0);
                        cell
                    })
                })
                .collect();

            let speedups = family
                .speedups
                .iter()
                .map(|s| {
                    let num = speedup_name(&s.numerator, model).ok()?;
                    let den = speedup_name(&s.denominator, model).ok()?;
                    ratio(mean_of(&num, metric), mean_of(&den, metric))
                })
                .collect();

            let phases = phases
                .iter()
                .map(|phase| {
                    names
                        .iter()
                        .map(|name| {
                            name.map(|name| {
                                let mean = mean_of(name, phase);
                                PhaseCell {
                                    mean,
                                    percent: ratio(mean, mean_of(name, TIME_KEY))
                                        .map(|r| 100.0 * r),
                                }
                            })
                        })
                        .collect()
                })
                .collect();

            FamilyRow {
                model: model.name.clone(),
                states: model.states,
                blocks: model.blocks,
                cells,
                speedups,
                phases,
            }
        })
        .collect();

    FamilyTable {
        family: family.name.clone(),
        metric: metric.to_string(),
        columns,
        speedups: family.speedups.iter().map(|s| s.label.clone()).collect(),
        phases: phases.to_vec(),
        rows,
    }
}
