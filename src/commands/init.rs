//! # Catalog Initialization Module / 目录初始化模块
//!
//! This module creates a starter `Sweep.toml`, either from a built-in example
//! or through an interactive command-line wizard that asks for the output
//! directory, the timeout budget and one family of experiments.
//!
//! 此模块创建一个初始的 `Sweep.toml`，可以来自内置示例，
//! 也可以通过交互式命令行向导询问输出目录、超时预算和一个实验家族。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use std::fs;
use std::path::Path;

use crate::core::config::{
    Catalog, DEFAULT_CATALOG_FILE, FamilySpec, ModelSpec, SpeedupSpec, VariantSpec,
};
use crate::core::descriptor::build_descriptors;
use crate::core::models::TIME_KEY;
use crate::core::parser::LogParser;
use crate::t;

/// Runs the wizard (or writes the example when `non_interactive`) into `Sweep.toml`.
///
/// 运行向导（或在 `non_interactive` 时直接写出示例）生成 `Sweep.toml`。
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let config_path = Path::new(DEFAULT_CATALOG_FILE);
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!("\n{}", t!("init_wizard_welcome", locale = language).cyan().bold());
        println!("{}", t!("init_wizard_description", locale = language));
    }

    if config_path.exists() {
        if non_interactive {
            anyhow::bail!(t!(
                "init_already_exists",
                locale = language,
                path = config_path.display()
            ));
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!(
                "init_overwrite_prompt",
                locale = language,
                path = config_path.display()
            ))
            .default(false)
            .interact()
            .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init_aborted", locale = language));
            return Ok(());
        }
    }

    let mut catalog = example_catalog(language);
    if non_interactive {
        return write_config(config_path, &catalog, language);
    }

    catalog.outdir = Input::with_theme(&theme)
        .with_prompt(t!("init_outdir_prompt", locale = language))
        .default(catalog.outdir)
        .interact_text()?;
    catalog.timeout = Input::with_theme(&theme)
        .with_prompt(t!("init_timeout_prompt", locale = language))
        .default(catalog.timeout)
        .validate_with(|v: &u64| {
            if *v > 0 {
                Ok(())
            } else {
                Err(t!("init_timeout_positive", locale = language).to_string())
            }
        })
        .interact_text()?;

    let add_family = Confirm::with_theme(&theme)
        .with_prompt(t!("init_family_prompt", locale = language))
        .default(true)
        .interact()
        .context(t!("init_user_confirmation_failed", locale = language).to_string())?;
    if add_family {
        catalog.families = vec![prompt_family(&theme, language)?];
    }

    write_config(config_path, &catalog, language)
}

fn prompt_family(theme: &ColorfulTheme, language: &str) -> Result<FamilySpec> {
    let name: String = Input::with_theme(theme)
        .with_prompt(t!("init_family_name_prompt", locale = language))
        .default("lts".to_string())
        .interact_text()?;
    let model: String = Input::with_theme(theme)
        .with_prompt(t!("init_model_name_prompt", locale = language))
        .interact_text()?;
    let input: String = Input::with_theme(theme)
        .with_prompt(t!("init_model_input_prompt", locale = language))
        .default(format!("models/{model}.bdd"))
        .interact_text()?;
    let command: String = Input::with_theme(theme)
        .with_prompt(t!("init_command_prompt", locale = language))
        .default("./sigrefmc {input} -w {workers}".to_string())
        .interact_text()?;

    let parsers = [LogParser::Mc, LogParser::McQuotient, LogParser::Rw, LogParser::Gmp];
    let choice = Select::with_theme(theme)
        .with_prompt(t!("init_parser_prompt", locale = language))
        .items(&parsers.iter().map(|p| p.as_str()).collect::<Vec<_>>())
        .default(0)
        .interact()?;

    let workers: String = Input::with_theme(theme)
        .with_prompt(t!("init_workers_prompt", locale = language))
        .default("1".to_string())
        .interact_text()?;
    let workers = workers
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .context(t!("init_workers_invalid", locale = language).to_string())?;

    Ok(FamilySpec {
        name: name.clone(),
        models: vec![ModelSpec {
            name: model,
            input: vec![input],
            states: None,
            blocks: None,
        }],
        variants: vec![VariantSpec {
            name: format!("{{model}}-{name}-{{workers}}"),
            command,
            parser: parsers[choice],
            label: None,
            workers,
            exclude: vec![],
        }],
        speedups: vec![],
        phases: vec![],
        metrics: vec![TIME_KEY.to_string()],
    })
}

/// A small but complete catalog: one family, two worker counts and a speedup column.
pub fn example_catalog(language: &str) -> Catalog {
    Catalog {
        language: Some(language.to_string()),
        families: vec![FamilySpec {
            name: "lts".to_string(),
            models: vec![ModelSpec {
                name: "kanban01".to_string(),
                input: vec!["models/kanban01.bdd".to_string()],
                states: None,
                blocks: None,
            }],
            variants: vec![VariantSpec {
                name: "{model}-s-{workers}".to_string(),
                command: "./sigrefmc {input} -w {workers} -l s".to_string(),
                parser: LogParser::Mc,
                label: None,
                workers: vec![1, 4],
                exclude: vec![],
            }],
            speedups: vec![SpeedupSpec {
                label: "Speedup".to_string(),
                numerator: "{model}-s-1".to_string(),
                denominator: "{model}-s-4".to_string(),
            }],
            phases: vec!["tsig".to_string(), "tref".to_string()],
            metrics: vec![TIME_KEY.to_string()],
        }],
        ..Catalog::default()
    }
}

fn write_config(path: &Path, catalog: &Catalog, language: &str) -> Result<()> {
    build_descriptors(catalog)
        .context(t!("init_serialize_failed", locale = language).to_string())?;
    let toml_string = toml::to_string_pretty(catalog)
        .context(t!("init_serialize_failed", locale = language).to_string())?;

    fs::write(path, toml_string).with_context(|| {
        t!("init_write_failed", locale = language, path = path.display()).to_string()
    })?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init_success_created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init_usage_hint", locale = language));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::parse_catalog;

    #[test]
    fn example_catalog_survives_a_toml_round_trip() {
        let catalog = example_catalog("en");
        let text = toml::to_string_pretty(&catalog).unwrap();
        assert_eq!(parse_catalog(&text).unwrap(), catalog);

        let names: Vec<_> = build_descriptors(&catalog)
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["kanban01-s-1", "kanban01-s-4"]);
    }
}
