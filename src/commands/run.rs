//! The `run` command: drive sweeps until interrupted or `--sweeps` is reached.
//! `run` 命令：持续运行扫描，直到被中断或达到 `--sweeps` 次数。

use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::commands::load_session;
use crate::core::config::{EngineSettings, SettingsOverrides};
use crate::core::scheduler::{Engine, Scheduler};
use crate::t;

/// Command-line overrides for `run`.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub config: PathBuf,
    pub lang: Option<String>,
    pub outdir: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub settle: Option<f64>,
    pub seed: Option<u64>,
    pub sweeps: Option<usize>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let session = load_session(&args.config, args.lang.as_deref())?;
    let locale = session.locale.clone();

    println!(
        "{}",
        t!("loading_catalog", locale = &locale, path = args.config.display())
    );

    let overrides = SettingsOverrides {
        outdir: args.outdir,
        timeout: args.timeout,
        settle_secs: args.settle,
    };
    let settings = EngineSettings::resolve(&session.catalog, &overrides)?;

    println!(
        "{}",
        t!(
            "run.plan",
            locale = &locale,
            count = session.descriptors.len(),
            outdir = settings.outdir.display(),
            timeout = settings.timeout_secs
        )
        .bold()
    );

    let stop_token = setup_signal_handler(&locale);
    let engine = Engine::new(settings, session.descriptors);
    let mut scheduler = Scheduler::new(engine, stop_token);
    if let Some(seed) = args.seed {
        scheduler = scheduler.with_seed(seed);
    }

    scheduler.run_experiments(args.sweeps).await?;

    if let Some(sweeps) = args.sweeps {
        println!(
            "\n{}",
            t!("run.finished", locale = &locale, sweeps = sweeps).green().bold()
        );
    }
    Ok(())
}

/// Cancels the returned token on the first Ctrl-C.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    token
}
