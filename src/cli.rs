// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::commands::{self, report::ReportArgs, run::RunArgs};
use crate::core::config::DEFAULT_CATALOG_FILE;
use crate::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn explicit_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
}

fn config_arg(locale: &str) -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help(t!("arg_config", locale = locale).to_string())
        .value_name("CONFIG")
        .default_value(DEFAULT_CATALOG_FILE)
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn outdir_arg(locale: &str) -> Arg {
    Arg::new("outdir")
        .long("outdir")
        .help(t!("arg_outdir", locale = locale).to_string())
        .value_name("DIR")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn build_cli(locale: &str) -> Command {
    Command::new("sweep-runner")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(outdir_arg(locale))
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help(t!("arg_timeout", locale = locale).to_string())
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("settle")
                        .long("settle")
                        .help(t!("arg_settle", locale = locale).to_string())
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(f64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help(t!("arg_seed", locale = locale).to_string())
                        .value_name("SEED")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("sweeps")
                        .long("sweeps")
                        .help(t!("arg_sweeps", locale = locale).to_string())
                        .value_name("N")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("report")
                .about(t!("cmd_report_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(outdir_arg(locale))
                .arg(
                    Arg::new("latex")
                        .long("latex")
                        .help(t!("arg_latex", locale = locale).to_string())
                        .value_name("DIR")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg_json", locale = locale).to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn config_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let explicit = explicit_language();
    match &explicit {
        Some(lang) => crate::set_language(lang),
        None => crate::init(),
    }
    let language = rust_i18n::locale().to_string();

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let args = RunArgs {
                config: config_path(run_matches),
                lang: explicit,
                outdir: run_matches.get_one::<PathBuf>("outdir").cloned(),
                timeout: run_matches.get_one::<u64>("timeout").copied(),
                settle: run_matches.get_one::<f64>("settle").copied(),
                seed: run_matches.get_one::<u64>("seed").copied(),
                sweeps: run_matches.get_one::<usize>("sweeps").copied(),
            };
            commands::run::execute(args).await?;
        }
        Some(("report", report_matches)) => {
            let args = ReportArgs {
                config: config_path(report_matches),
                lang: explicit,
                outdir: report_matches.get_one::<PathBuf>("outdir").cloned(),
                latex: report_matches.get_one::<PathBuf>("latex").cloned(),
                html: report_matches.get_one::<PathBuf>("html").cloned(),
                json: report_matches.get_one::<PathBuf>("json").cloned(),
            };
            commands::report::execute(args)?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");

            // Show language detection message if it was auto-detected
            if explicit.is_none() && !non_interactive {
                println!(
                    "🌐 {}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(&language, non_interactive)?;
        }
        _ => {
            // Clap has already printed help info.
        }
    }
    Ok(())
}
