//! # Streaming Statistics Module / 流式统计模块
//!
//! Single-pass mean and sample variance (Welford's method) over repeated trial
//! measurements, and grouping of completed trials by experiment name and
//! metric key. Undefined values are `NaN`; the reporting layer turns them into
//! a `--` placeholder.
//!
//! 基于重复试验测量的单遍均值和样本方差（Welford 方法），以及按实验名称和指标键对已完成试验分组。
//! 未定义的值为 `NaN`，报告层会将其显示为 `--` 占位符。

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::models::MetricsMap;

/// Running accumulator for Welford's algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlineStats {
    n: usize,
    mean: f64,
    m2: f64,
}

impl OnlineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn summary(&self) -> Summary {
        match self.n {
            0 => Summary {
                count: 0,
                mean: f64::NAN,
                variance: f64::NAN,
            },
            1 => Summary {
                count: 1,
                mean: self.mean,
                variance: f64::NAN,
            },
            n => Summary {
                count: n,
                mean: self.mean,
                variance: self.m2 / (n - 1) as f64,
            },
        }
    }
}

impl Extend<f64> for OnlineStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

impl FromIterator<f64> for OnlineStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = OnlineStats::new();
        stats.extend(iter);
        stats
    }
}

/// `(count, mean, variance)` of one group of measurements.
/// 一组测量值的 `(数量, 均值, 方差)`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
}

impl Summary {
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Mean and sample variance of `data` in one pass.
pub fn online_variance<I: IntoIterator<Item = f64>>(data: I) -> Summary {
    data.into_iter().collect::<OnlineStats>().summary()
}

/// Experiment name -> metric key -> summary.
pub type Aggregate = BTreeMap<String, BTreeMap<String, Summary>>;

/// Groups completed trials by experiment name and metric key. Metrics absent
/// from a trial simply do not contribute to that key's group.
///
/// 按实验名称和指标键对已完成的试验分组。某次试验中缺失的指标不会计入该键的分组。
pub fn aggregate<'a, I>(results: I) -> Aggregate
where
    I: IntoIterator<Item = &'a (String, MetricsMap)>,
{
    let mut acc: BTreeMap<String, BTreeMap<String, OnlineStats>> = BTreeMap::new();
    for (name, metrics) in results {
        let per_metric = acc.entry(name.clone()).or_default();
        for (key, value) in metrics {
            per_metric.entry(key.clone()).or_default().push(*value);
        }
    }
    acc.into_iter()
        .map(|(name, metrics)| {
            let summaries = metrics
                .into_iter()
                .map(|(key, stats)| (key, stats.summary()))
                .collect();
            (name, summaries)
        })
        .collect()
}

/// `numerator / denominator`, or `None` when the quotient is not meaningful
/// (zero or NaN denominator, NaN numerator).
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if numerator.is_nan() || denominator.is_nan() || denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Placeholder printed for undefined cells.
pub const PLACEHOLDER: &str = "--";

/// Formats a value with two decimals, or [`PLACEHOLDER`] when undefined.
pub fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => PLACEHOLDER.to_string(),
    }
}
