//! # Experiment Descriptor Module / 实验描述符模块
//!
//! An [`ExperimentDescriptor`] is the immutable identity of one experiment
//! variant: a unique name, the argument vector used to launch the external
//! tool, and the [`LogParser`] that decides whether a log proves completion.
//! Descriptors are built once at startup from the catalog and validated there,
//! so the scheduler never meets a malformed invocation at run time.
//!
//! [`ExperimentDescriptor`] 是单个实验变体的不可变标识：唯一名称、启动外部工具的参数向量，
//! 以及判断日志是否证明完成的 [`LogParser`]。描述符在启动时从目录构建一次并在那时完成校验，
//! 因此调度器在运行时永远不会遇到格式错误的调用。

use std::collections::HashSet;

use crate::core::config::{Catalog, FamilySpec, ModelSpec, VariantSpec};
use crate::core::error::ConfigError;
use crate::core::models::MetricsMap;
use crate::core::parser::LogParser;

/// Where a descriptor came from in the catalog; used to lay out reports.
/// 描述符在目录中的来源，用于排布报告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub family: String,
    pub model: String,
    /// Report column label of the variant (worker count included).
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentDescriptor {
    name: String,
    invocation: Vec<String>,
    parser: LogParser,
    origin: Option<Origin>,
}

impl ExperimentDescriptor {
    /// Creates a standalone descriptor. The invocation must name a program.
    pub fn new(
        name: impl Into<String>,
        invocation: Vec<String>,
        parser: LogParser,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if invocation.first().is_none_or(|p| p.is_empty()) {
            return Err(ConfigError::EmptyCommand {
                family: String::new(),
                variant: name,
            });
        }
        Ok(Self {
            name,
            invocation,
            parser,
            origin: None,
        })
    }

    fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program followed by its arguments.
    pub fn invocation(&self) -> &[String] {
        &self.invocation
    }

    pub fn program(&self) -> &str {
        &self.invocation[0]
    }

    pub fn args(&self) -> &[String] {
        &self.invocation[1..]
    }

    pub fn parser(&self) -> LogParser {
        self.parser
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    pub fn parse(&self, content: &str) -> Option<MetricsMap> {
        self.parser.parse(content)
    }

    /// The command line as it would be typed in a shell, for display.
    pub fn command_line(&self) -> String {
        shlex::try_join(self.invocation.iter().map(String::as_str))
            .unwrap_or_else(|_| self.invocation.join(" "))
    }
}

/// Values available to `{...}` placeholders while expanding one descriptor.
struct Vars<'a> {
    variant: &'a str,
    model: &'a ModelSpec,
    workers: Option<u32>,
}

/// Expands every family of the catalog into descriptors, in catalog order.
/// Fails on the first invalid template or on a duplicate experiment name.
///
/// 将目录中的每个家族按目录顺序展开为描述符。
/// 遇到第一个无效模板或重复的实验名称时失败。
pub fn build_descriptors(catalog: &Catalog) -> Result<Vec<ExperimentDescriptor>, ConfigError> {
    let mut descriptors = Vec::new();
    let mut seen = HashSet::new();

    for family in &catalog.families {
        let family_descriptors = expand_family(family)?;
        for descriptor in &family_descriptors {
            if !seen.insert(descriptor.name.clone()) {
                return Err(ConfigError::DuplicateName(descriptor.name.clone()));
            }
        }
        validate_speedups(family, &family_descriptors)?;
        descriptors.extend(family_descriptors);
    }

    Ok(descriptors)
}

fn expand_family(family: &FamilySpec) -> Result<Vec<ExperimentDescriptor>, ConfigError> {
    let mut out = Vec::new();
    for variant in &family.variants {
        let worker_axis: Vec<Option<u32>> = if variant.workers.is_empty() {
            vec![None]
        } else {
            variant.workers.iter().copied().map(Some).collect()
        };

        for workers in worker_axis {
            for model in &family.models {
                if variant.exclude.iter().any(|m| m == &model.name) {
                    continue;
                }
                out.push(expand_variant(family, variant, model, workers)?);
            }
        }
    }
    Ok(out)
}

fn expand_variant(
    family: &FamilySpec,
    variant: &VariantSpec,
    model: &ModelSpec,
    workers: Option<u32>,
) -> Result<ExperimentDescriptor, ConfigError> {
    let vars = Vars {
        variant: &variant.name,
        model,
        workers,
    };

    let name = expand_placeholders(&variant.name, &vars)?;

    let expanded = shellexpand::full(&variant.command).map_err(|e| ConfigError::Expansion {
        template: variant.command.clone(),
        reason: e.to_string(),
    })?;
    let tokens = shlex::split(&expanded)
        .ok_or_else(|| ConfigError::UnbalancedQuotes(variant.command.clone()))?;

    let mut invocation = Vec::with_capacity(tokens.len() + model.input.len());
    for token in tokens {
        if token == "{input}" {
            invocation.extend(model.input.iter().cloned());
        } else {
            invocation.push(expand_placeholders(&token, &vars)?);
        }
    }

    if invocation.first().is_none_or(|p| p.is_empty()) {
        return Err(ConfigError::EmptyCommand {
            family: family.name.clone(),
            variant: variant.name.clone(),
        });
    }

    let column = column_label(variant, &vars)?;
    Ok(ExperimentDescriptor {
        name,
        invocation,
        parser: variant.parser,
        origin: None,
    }
    .with_origin(Origin {
        family: family.name.clone(),
        model: model.name.clone(),
        column,
    }))
}

fn column_label(variant: &VariantSpec, vars: &Vars<'_>) -> Result<String, ConfigError> {
    match &variant.label {
        Some(label) => {
            let mut expanded = expand_placeholders(label, vars)?;
            if let (false, Some(w)) = (label.contains("{workers}"), vars.workers) {
                if variant.workers.len() > 1 {
                    expanded = format!("{expanded}_{w}");
                }
            }
            Ok(expanded)
        }
        None => {
            let template = variant.name.replacen("{model}-", "", 1);
            expand_placeholders(&template, vars)
        }
    }
}

/// Replaces `{model}`, `{workers}` and `{input}` inside one template string.
fn expand_placeholders(template: &str, vars: &Vars<'_>) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };
        let key = &after[..end];
        match key {
            "model" => out.push_str(&vars.model.name),
            "input" => out.push_str(&vars.model.input.join(" ")),
            "workers" => match vars.workers {
                Some(w) => out.push_str(&w.to_string()),
                None => {
                    return Err(ConfigError::MissingWorkers {
                        template: template.to_string(),
                        variant: vars.variant.to_string(),
                    });
                }
            },
            other => {
                return Err(ConfigError::UnknownPlaceholder {
                    template: template.to_string(),
                    placeholder: other.to_string(),
                });
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Expands a speedup name template for one model.
pub fn speedup_name(template: &str, model: &ModelSpec) -> Result<String, ConfigError> {
    let vars = Vars {
        variant: template,
        model,
        workers: None,
    };
    expand_placeholders(template, &vars)
}

fn validate_speedups(
    family: &FamilySpec,
    descriptors: &[ExperimentDescriptor],
) -> Result<(), ConfigError> {
    for speedup in &family.speedups {
        for template in [&speedup.numerator, &speedup.denominator] {
            let mut found = family.models.is_empty();
            for model in &family.models {
                let name = speedup_name(template, model)?;
                found |= descriptors.iter().any(|d| d.name == name);
            }
            if !found {
                return Err(ConfigError::UnknownSpeedupReference {
                    family: family.name.clone(),
                    label: speedup.label.clone(),
                    name: template.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{SpeedupSpec, parse_catalog};

    const CATALOG: &str = r#"
[[families]]
name = "ctmc"

[[families.models]]
name = "cycling-2"
input = ["models/cycling-2.xctmc"]

[[families.models]]
name = "kanban07"
input = ["models/kanban07.xctmc"]

[[families.variants]]
name = "{model}-fr-{workers}"
command = "./sigrefmc {input} -w {workers} -l fr"
parser = "mc"
workers = [1, 48]

[[families.variants]]
name = "{model}-gmp"
command = "./sigref_gmp --infile={input}"
parser = "gmp"
exclude = ["kanban07"]
"#;

    #[test]
    fn expands_models_variants_and_workers() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let descriptors = build_descriptors(&catalog).unwrap();
        let names: Vec<_> = descriptors.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            [
                "cycling-2-fr-1",
                "kanban07-fr-1",
                "cycling-2-fr-48",
                "kanban07-fr-48",
                "cycling-2-gmp",
            ]
        );

        let d = &descriptors[2];
        assert_eq!(
            d.invocation(),
            ["./sigrefmc", "models/cycling-2.xctmc", "-w", "48", "-l", "fr"]
        );
        assert_eq!(d.parser(), LogParser::Mc);
        assert_eq!(d.origin().unwrap().column, "fr-48");

        let gmp = &descriptors[4];
        assert_eq!(gmp.invocation(), ["./sigref_gmp", "--infile=models/cycling-2.xctmc"]);
        assert_eq!(gmp.origin().unwrap().column, "gmp");
    }

    #[test]
    fn workers_placeholder_requires_workers() {
        let mut catalog = parse_catalog(CATALOG).unwrap();
        catalog.families[0].variants[0].workers.clear();
        assert!(matches!(
            build_descriptors(&catalog),
            Err(ConfigError::MissingWorkers { .. })
        ));
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let mut catalog = parse_catalog(CATALOG).unwrap();
        catalog.families[0].variants[1].command = "./tool {modle}".to_string();
        assert_eq!(
            build_descriptors(&catalog),
            Err(ConfigError::UnknownPlaceholder {
                template: "{modle}".to_string(),
                placeholder: "modle".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = parse_catalog(CATALOG).unwrap();
        catalog.families[0].variants[1].name = "{model}-fr-1".to_string();
        catalog.families[0].variants[1].exclude.clear();
        assert_eq!(
            build_descriptors(&catalog),
            Err(ConfigError::DuplicateName("cycling-2-fr-1".to_string()))
        );
    }

    #[test]
    fn explicit_label_gets_worker_suffix() {
        let mut catalog = parse_catalog(CATALOG).unwrap();
        catalog.families[0].variants[0].label = Some("T".to_string());
        let descriptors = build_descriptors(&catalog).unwrap();
        let columns: Vec<_> = descriptors
            .iter()
            .map(|d| d.origin().unwrap().column.as_str())
            .collect();
        assert_eq!(columns, ["T_1", "T_1", "T_48", "T_48", "gmp"]);
    }

    #[test]
    fn speedups_must_reference_existing_experiments() {
        let mut catalog = parse_catalog(CATALOG).unwrap();
        catalog.families[0].speedups.push(SpeedupSpec {
            label: "Speedup".to_string(),
            numerator: "{model}-fr-1".to_string(),
            denominator: "{model}-fr-64".to_string(),
        });
        assert!(matches!(
            build_descriptors(&catalog),
            Err(ConfigError::UnknownSpeedupReference { .. })
        ));
    }

    #[test]
    fn standalone_descriptor_needs_a_program() {
        assert!(ExperimentDescriptor::new("x", vec![], LogParser::Mc).is_err());
        let d = ExperimentDescriptor::new("x", vec!["sh".into(), "-c".into(), "echo hi".into()], LogParser::Mc)
            .unwrap();
        assert_eq!(d.program(), "sh");
        assert_eq!(d.args(), ["-c", "echo hi"]);
        assert!(d.command_line().starts_with("sh -c "));
        assert!(d.command_line().contains("echo hi"));
    }
}
