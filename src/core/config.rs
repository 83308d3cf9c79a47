//! # Catalog Configuration Module / 目录配置模块
//!
//! The sweep catalog is loaded from a TOML file. It holds the engine settings
//! (output directory, timeout budget, pause between trials) and a list of
//! experiment families. A family crosses its models with its tool variants
//! (and each variant's worker counts) to produce the descriptors that the
//! scheduler runs; see [`crate::core::descriptor`].
//!
//! 扫描目录从 TOML 文件加载。它包含引擎设置（输出目录、超时预算、试验之间的暂停）
//! 以及实验家族列表。每个家族将其模型与工具变体（以及每个变体的工作线程数）交叉组合，
//! 生成调度器运行的描述符。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::ConfigError;
use crate::core::models::TIME_KEY;
use crate::core::parser::LogParser;

pub const DEFAULT_CATALOG_FILE: &str = "Sweep.toml";

/// What to do with the partial log of a trial the operator interrupted.
/// 如何处理被操作员中断的试验的部分日志。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptPolicy {
    /// Move it aside to `<artifact>.interrupted` for inspection.
    /// 将其移到 `<artifact>.interrupted` 以便检查。
    #[default]
    Rename,
    /// Delete it.
    /// 删除它。
    Discard,
}

/// One input model of a family.
/// 家族中的一个输入模型。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelSpec {
    /// Short model name, substituted for `{model}`.
    pub name: String,
    /// Arguments substituted for a standalone `{input}` token, usually the model file.
    #[serde(default)]
    pub input: Vec<String>,
    /// Number of states of the input, shown in LaTeX tables when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<u64>,
    /// Number of blocks of the final partition, shown in LaTeX tables when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<u64>,
}

/// One way of invoking a tool on every model of a family.
/// 在家族的每个模型上调用工具的一种方式。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VariantSpec {
    /// Experiment name template, e.g. `"{model}-fr-{workers}"`. Must be unique after expansion.
    pub name: String,
    /// Command line template, e.g. `"./sigrefmc {input} -w {workers} -l fr"`.
    pub command: String,
    /// How to read the tool's output.
    pub parser: LogParser,
    /// Report column label; defaults to the name template with `{model}-` stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Worker counts. Each one yields its own descriptor. Required when a
    /// template mentions `{workers}`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workers: Vec<u32>,
    /// Models this variant skips (e.g. inputs too large for the tool).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// A speedup column: `mean(numerator) / mean(denominator)` per model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpeedupSpec {
    pub label: String,
    /// Experiment name template of the slower/baseline run, e.g. `"{model}-fr-1"`.
    pub numerator: String,
    /// Experiment name template of the faster/candidate run, e.g. `"{model}-fr-48"`.
    pub denominator: String,
}

/// A group of experiments reported together.
/// 一组一起报告的实验。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FamilySpec {
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub variants: Vec<VariantSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speedups: Vec<SpeedupSpec>,
    /// Phase metrics (e.g. `tsig`, `tref`) broken down as a share of `time`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<String>,
    /// Metrics tabulated for this family, one table each (e.g. `tquot`, `newmarkov`).
    /// 为该家族制表的指标，每个指标一张表。
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
}

fn default_metrics() -> Vec<String> {
    vec![TIME_KEY.to_string()]
}

/// The entire sweep catalog, loaded from a TOML file.
/// 从 TOML 文件加载的整个扫描目录。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Unset means the system locale.
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。未设置时使用系统语言。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Directory holding one primary log (and possibly one timeout marker) per trial.
    /// 每次试验保存一个主日志（以及可能的一个超时标记）的目录。
    #[serde(default = "default_outdir")]
    pub outdir: String,

    /// Wall-clock budget per trial, in seconds.
    /// 每次试验的墙钟时间预算（秒）。
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause after every trial that launched a process, in seconds.
    /// 每次启动进程的试验之后的暂停时间（秒）。
    #[serde(default = "default_settle_secs")]
    pub settle_secs: f64,

    #[serde(default)]
    pub on_interrupt: InterruptPolicy,

    #[serde(default)]
    pub families: Vec<FamilySpec>,
}

fn default_outdir() -> String {
    "out".to_string()
}

fn default_timeout() -> u64 {
    1200
}

fn default_settle_secs() -> f64 {
    2.0
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            language: None,
            outdir: default_outdir(),
            timeout: default_timeout(),
            settle_secs: default_settle_secs(),
            on_interrupt: InterruptPolicy::default(),
            families: vec![],
        }
    }
}

impl Catalog {
    /// The output directory with `~` and environment variables expanded.
    pub fn outdir_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.outdir)
            .with_context(|| format!("Failed to expand output directory: {}", self.outdir))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// The pause between trials. Negative or non-finite values are rejected.
    pub fn settle_delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.settle_secs)
            .map_err(|_| ConfigError::InvalidSettle(self.settle_secs.to_string()))
    }

    /// Checks what can be checked before expansion: the settle delay, and the
    /// family and metric names that end up in report file names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settle_delay()?;
        for family in &self.families {
            for name in std::iter::once(&family.name).chain(&family.metrics) {
                if !is_file_stem(name) {
                    return Err(ConfigError::InvalidFileStem(name.clone()));
                }
            }
        }
        Ok(())
    }
}

fn is_file_stem(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Command-line values that take precedence over the catalog.
/// 优先于目录设置的命令行值。
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub outdir: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub settle_secs: Option<f64>,
}

/// Engine settings resolved from the catalog and command-line overrides.
/// 从目录和命令行覆盖项解析出的引擎设置。
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub outdir: PathBuf,
    pub timeout_secs: u64,
    pub settle_delay: Duration,
    pub on_interrupt: InterruptPolicy,
}

impl EngineSettings {
    pub fn new(outdir: impl Into<PathBuf>, timeout_secs: u64) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            outdir: outdir.into(),
            timeout_secs,
            settle_delay: Duration::from_secs_f64(default_settle_secs()),
            on_interrupt: InterruptPolicy::default(),
        })
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_interrupt_policy(mut self, policy: InterruptPolicy) -> Self {
        self.on_interrupt = policy;
        self
    }

    pub fn from_catalog(catalog: &Catalog) -> Result<Self> {
        Self::resolve(catalog, &SettingsOverrides::default())
    }

    /// Merges the overrides into the catalog values, then validates the result.
    /// 先将覆盖项合并到目录值中，再校验结果。
    pub fn resolve(catalog: &Catalog, overrides: &SettingsOverrides) -> Result<Self> {
        let outdir = match &overrides.outdir {
            Some(outdir) => outdir.clone(),
            None => catalog.outdir_path()?,
        };
        let settle_secs = overrides.settle_secs.unwrap_or(catalog.settle_secs);
        let settle_delay = Duration::try_from_secs_f64(settle_secs)
            .map_err(|_| ConfigError::InvalidSettle(settle_secs.to_string()))?;
        Ok(
            Self::new(outdir, overrides.timeout.unwrap_or(catalog.timeout))?
                .with_settle_delay(settle_delay)
                .with_interrupt_policy(catalog.on_interrupt),
        )
    }
}

/// Reads and parses a catalog file.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    parse_catalog(&content).with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let catalog: Catalog = toml::from_str(content)?;
    catalog.validate()?;
    Ok(catalog)
}
