//! # Scheduler Module / 调度模块
//!
//! [`Engine`] binds a descriptor collection to one output directory and one
//! timeout budget. Its [`Engine::get_results`] scan reconstructs the whole
//! history of a sweep from the artifacts on disk. [`Scheduler`] drives the
//! sweep: every step reports progress, shuffles the descriptors and runs each
//! of them once at the current iteration. Trials never overlap, so the timings
//! of one tool are not disturbed by another.
//!
//! [`Engine`] 将描述符集合绑定到一个输出目录和一个超时预算。其 `get_results` 扫描
//! 从磁盘上的产物重建扫描的完整历史。[`Scheduler`] 驱动扫描：每一步报告进度、打乱描述符顺序，
//! 并在当前迭代上逐个运行。试验从不重叠，因此一个工具的计时不会受到另一个工具的干扰。

use colored::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;

use crate::core::config::EngineSettings;
use crate::core::descriptor::ExperimentDescriptor;
use crate::core::error::{StoreError, TrialError};
use crate::core::execution::{TrialOutcome, TrialRunner};
use crate::core::models::{RunStatus, SweepResults};
use crate::core::store::ArtifactStore;
use crate::infra::fs::ensure_dir;
use crate::infra::t;

/// A set of experiments bound to one output directory.
/// 绑定到一个输出目录的一组实验。
#[derive(Debug, Clone)]
pub struct Engine {
    settings: EngineSettings,
    store: ArtifactStore,
    descriptors: Vec<ExperimentDescriptor>,
}

impl Engine {
    pub fn new(settings: EngineSettings, descriptors: Vec<ExperimentDescriptor>) -> Self {
        Self {
            store: ArtifactStore::new(&settings.outdir),
            settings,
            descriptors,
        }
    }

    pub fn descriptors(&self) -> &[ExperimentDescriptor] {
        &self.descriptors
    }

    /// Scans iterations 0, 1, 2, ... and collects every recorded outcome.
    ///
    /// The scan stops at the first iteration where *no* descriptor has any
    /// usable artifact; nothing beyond it was ever attempted. That stopping
    /// row is excluded from both the iteration count and the not-done count.
    ///
    /// 依次扫描迭代 0, 1, 2, ... 并收集所有已记录的结果。
    /// 扫描在第一个所有描述符都没有可用产物的迭代处停止；此后的迭代从未被尝试过。
    /// 该停止行既不计入迭代数，也不计入未完成数。
    pub fn get_results(&self) -> Result<SweepResults, StoreError> {
        let mut out = SweepResults::default();
        let mut not_done_total = 0;
        let mut next_iteration = None;

        let mut iteration = 0;
        loop {
            let mut stop = true;
            for descriptor in &self.descriptors {
                let record = self.store.status_at(descriptor, iteration)?;
                if record.is_pending(self.settings.timeout_secs) && next_iteration.is_none() {
                    next_iteration = Some(iteration);
                }
                match record.status {
                    RunStatus::Done => {
                        stop = false;
                        if let Some(metrics) = record.metrics {
                            out.results.push((descriptor.name().to_string(), metrics));
                        }
                    }
                    RunStatus::Timeout => {
                        stop = false;
                        let seconds = record.timeout_secs().unwrap_or_default();
                        out.timeouts.push((descriptor.name().to_string(), seconds));
                    }
                    RunStatus::NotDone => not_done_total += 1,
                }
            }
            if stop {
                out.iterations = iteration;
                out.not_done = not_done_total - self.descriptors.len();
                out.next_iteration = next_iteration.unwrap_or(iteration);
                return Ok(out);
            }
            iteration += 1;
        }
    }
}

/// What one scheduler step did.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Progress as scanned before the step.
    pub progress: SweepResults,
    /// The iteration the step worked on.
    pub iteration: usize,
    /// Outcome per experiment, in execution order.
    pub outcomes: Vec<(String, TrialOutcome)>,
}

impl SweepReport {
    pub fn launched(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.ran()).count()
    }
}

/// Drives an [`Engine`] sweep after sweep.
/// 逐次驱动 [`Engine`] 的扫描。
pub struct Scheduler {
    engine: Engine,
    runner: TrialRunner,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(engine: Engine, cancel: CancellationToken) -> Self {
        let runner = TrialRunner::new(
            engine.settings.settle_delay,
            engine.settings.on_interrupt,
            cancel,
        );
        Self {
            engine,
            runner,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixes the shuffle order, for reproducible test runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// One step: report progress, shuffle, run every descriptor once at the
    /// smallest iteration that still has work.
    pub async fn sweep(&mut self) -> Result<SweepReport, TrialError> {
        let progress = self.engine.get_results()?;
        println!(
            "{}",
            t!(
                "run.progress",
                iterations = progress.iterations,
                successful = progress.successful(),
                timeouts = progress.timed_out(),
                not_done = progress.not_done
            )
            .cyan()
        );

        let iteration = progress.next_iteration;
        println!("{}", t!("run.iteration", iteration = iteration).bold());

        self.engine.descriptors.shuffle(&mut self.rng);

        let timeout_secs = self.engine.settings.timeout_secs;
        let mut outcomes = Vec::with_capacity(self.engine.descriptors.len());
        for descriptor in &self.engine.descriptors {
            if self.runner.cancel_token().is_cancelled() {
                return Err(TrialError::Interrupted {
                    experiment: descriptor.name().to_string(),
                });
            }
            let artifact = self.engine.store.path_for(descriptor.name(), iteration);
            let outcome = self
                .runner
                .run_experiment(descriptor, timeout_secs, &artifact)
                .await?;
            outcomes.push((descriptor.name().to_string(), outcome));
        }

        Ok(SweepReport {
            progress,
            iteration,
            outcomes,
        })
    }

    /// Runs sweeps until interrupted, or until `max_sweeps` steps when given.
    /// Interruption surfaces as [`TrialError::Interrupted`].
    ///
    /// 持续运行扫描直到被中断；若给定 `max_sweeps`，则运行相应次数。
    pub async fn run_experiments(&mut self, max_sweeps: Option<usize>) -> Result<(), TrialError> {
        let outdir = self.engine.store.outdir().to_path_buf();
        ensure_dir(&outdir).map_err(|source| TrialError::Io {
            path: outdir,
            source,
        })?;

        if self.engine.descriptors.is_empty() {
            println!("{}", t!("run.no_experiments").yellow());
            return Ok(());
        }

        let mut completed = 0;
        while max_sweeps.is_none_or(|max| completed < max) {
            self.sweep().await?;
            completed += 1;
        }
        Ok(())
    }
}
