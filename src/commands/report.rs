//! The `report` command: scan the output directory and print or write the
//! aggregated results. Never launches a process.
//!
//! `report` 命令：扫描输出目录并打印或写出汇总结果，从不启动任何进程。

use anyhow::{Result, bail};
use colored::*;
use std::path::PathBuf;

use crate::commands::load_session;
use crate::core::config::{EngineSettings, SettingsOverrides};
use crate::core::scheduler::Engine;
use crate::infra::fs::is_directory;
use crate::reporting::{
    analyse, generate_html_report, print_families, print_progress, print_summary,
    write_json_report, write_tables,
};
use crate::t;

#[derive(Debug, Clone, Default)]
pub struct ReportArgs {
    pub config: PathBuf,
    pub lang: Option<String>,
    pub outdir: Option<PathBuf>,
    pub latex: Option<PathBuf>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

pub fn execute(args: ReportArgs) -> Result<()> {
    let session = load_session(&args.config, args.lang.as_deref())?;
    let locale = session.locale.as_str();

    let overrides = SettingsOverrides {
        outdir: args.outdir,
        ..Default::default()
    };
    let settings = EngineSettings::resolve(&session.catalog, &overrides)?;
    if !is_directory(&settings.outdir) {
        bail!(t!("report.outdir_missing", locale = locale, path = settings.outdir.display()));
    }

    let engine = Engine::new(settings, session.descriptors);
    let progress = engine.get_results()?;
    print_progress(&progress, locale);

    let analysis = analyse(&session.catalog, engine.descriptors(), progress);
    print_summary(&analysis, locale);
    print_families(&analysis, locale);

    if let Some(dir) = &args.latex {
        for path in write_tables(dir, &analysis.families)? {
            println!("{}", t!("report.written", locale = locale, path = path.display()).green());
        }
    }

    if let Some(path) = &args.html {
        generate_html_report(&analysis, path, locale)?;
        println!("{}", t!("report.written", locale = locale, path = path.display()).green());
    }

    if let Some(path) = &args.json {
        write_json_report(&analysis, path)?;
        println!("{}", t!("report.written", locale = locale, path = path.display()).green());
    }

    Ok(())
}
