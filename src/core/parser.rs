//! # Log Parser Module / 日志解析模块
//!
//! Each analysis-tool family prints its measurements in its own format. A
//! [`LogParser`] is the strategy attached to a descriptor that turns the raw
//! combined output of one trial into a [`MetricsMap`], or `None` when the log
//! does not prove a completed run.
//!
//! 每个分析工具家族都以自己的格式打印测量结果。[`LogParser`] 是附加在描述符上的策略，
//! 它将一次试验的原始合并输出转换为 [`MetricsMap`]；若日志不能证明运行已完成则返回 `None`。
//!
//! The required `time` pattern must match exactly once: zero matches means the
//! tool never finished, and several matches mean the log is ambiguous (for
//! example two runs appended to one file). Both cases yield `None`. Optional
//! patterns are only recorded when they match exactly once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::models::{MetricsMap, TIME_KEY};

static MC_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Time for computing the bisimulation relation: ([\d\.,]+)").expect("valid regex")
});
static MC_SIG_NEEDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Time needed for signature computation: ([\d\.,]+)").expect("valid regex"));
static MC_REF_NEEDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Time needed for partition refinement: ([\d\.,]+)").expect("valid regex"));
static MC_SIG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Time for signature computation: ([\d\.,]+)").expect("valid regex"));
static MC_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Time for partition refinement: ([\d\.,]+)").expect("valid regex"));
static MC_QUOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Time for computing the quotient of the transition relation: ([\d\.,]+)")
        .expect("valid regex")
});
static MC_NEW_MARKOV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"New Markov transition relation: ([\d\.,]+) transitions, ([\d\.,]+) MTBDD nodes")
        .expect("valid regex")
});
static MC_NEW_TRANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"New interactive transition relation: ([\d\.,]+) transitions, ([\d\.,]+) MTBDD nodes")
        .expect("valid regex")
});
static RW_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Time for computing the bisimulation relation =\s*([\d\.]+)").expect("valid regex")
});
static GMP_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Time for refinement: ([\d\.]+)").expect("valid regex"));

/// Parsing strategy for one analysis-tool family.
/// 单个分析工具家族的解析策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogParser {
    /// The multi-core symbolic tool: total time plus optional phase timings
    /// (`tsig`, `tref`, `tquot`) and quotient sizes (`newmarkov`, `newtrans`).
    /// 多核符号工具：总时间以及可选的阶段耗时和商大小。
    Mc,
    /// Like [`LogParser::Mc`], but a run only counts once the quotient phase (`tquot`) was reported.
    /// 与 `Mc` 相同，但只有报告了商计算阶段 (`tquot`) 才算完成。
    McQuotient,
    /// The reference sequential tool (`... bisimulation relation = X`).
    Rw,
    /// The exact-arithmetic refinement tool (`Time for refinement: X`).
    Gmp,
}

impl LogParser {
    /// Extracts the metrics from a raw log, or `None` if the log does not
    /// prove a completed run.
    pub fn parse(&self, content: &str) -> Option<MetricsMap> {
        match self {
            LogParser::Mc => parse_mc(content),
            LogParser::McQuotient => parse_mc(content).filter(|m| m.contains_key("tquot")),
            LogParser::Rw => parse_time_only(&RW_TIME, content),
            LogParser::Gmp => parse_time_only(&GMP_TIME, content),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogParser::Mc => "mc",
            LogParser::McQuotient => "mc-quotient",
            LogParser::Rw => "rw",
            LogParser::Gmp => "gmp",
        }
    }
}

fn parse_time_only(pattern: &Regex, content: &str) -> Option<MetricsMap> {
    let time = singular(pattern, content, 1)?;
    let mut metrics = MetricsMap::new();
    metrics.insert(TIME_KEY.to_string(), time);
    Some(metrics)
}

fn parse_mc(content: &str) -> Option<MetricsMap> {
    let mut metrics = parse_time_only(&MC_TIME, content)?;

    // Later patterns overwrite earlier ones: newer tool versions dropped the "needed".
    let optional: [(&str, &Lazy<Regex>, usize); 7] = [
        ("tsig", &MC_SIG_NEEDED, 1),
        ("tref", &MC_REF_NEEDED, 1),
        ("tsig", &MC_SIG, 1),
        ("tref", &MC_REF, 1),
        ("tquot", &MC_QUOT, 1),
        ("newmarkov", &MC_NEW_MARKOV, 2),
        ("newtrans", &MC_NEW_TRANS, 2),
    ];
    for (key, pattern, group) in optional {
        if let Some(value) = singular(pattern, content, group) {
            metrics.insert(key.to_string(), value);
        }
    }

    Some(metrics)
}

/// Returns the number captured by `group` if `pattern` matches exactly once.
fn singular(pattern: &Regex, content: &str, group: usize) -> Option<f64> {
    let mut matches = pattern.captures_iter(content);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    parse_number(first.get(group)?.as_str())
}

/// Parses a number printed with optional thousands separators.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}
