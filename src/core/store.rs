//! # Run Status Store Module / 运行状态存储模块
//!
//! The output directory *is* the database. Each (experiment, iteration) pair
//! owns at most two files:
//!
//! - `{outdir}/{name}-{iteration}`: the combined output of the last attempt;
//! - `{outdir}/{name}-{iteration}.timeout`: the budget (integer seconds) the
//!   last attempt exceeded.
//!
//! The status is never written down. It is derived from these files on every
//! query, so nothing can go stale and an interrupted sweep resumes by simply
//! scanning again.
//!
//! 输出目录本身就是数据库。每个 (实验, 迭代) 对最多拥有两个文件：主日志和超时标记。
//! 状态从不写入磁盘，而是在每次查询时从这些文件中推导出来，因此不会过时，
//! 中断的扫描只需重新扫描即可恢复。

use std::io;
use std::path::{Path, PathBuf};

use crate::core::descriptor::ExperimentDescriptor;
use crate::core::error::StoreError;
use crate::core::models::RunRecord;
use crate::infra::fs::{read_artifact, remove_if_exists, with_suffix};

/// File naming and status lookup for one output directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    outdir: PathBuf,
}

impl ArtifactStore {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
        }
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    /// `{outdir}/{name}-{iteration}`
    pub fn path_for(&self, name: &str, iteration: usize) -> PathBuf {
        self.outdir.join(format!("{name}-{iteration}"))
    }

    /// Status of `descriptor` at `iteration`.
    pub fn status_at(
        &self,
        descriptor: &ExperimentDescriptor,
        iteration: usize,
    ) -> Result<RunRecord, StoreError> {
        get_status(descriptor, &self.path_for(descriptor.name(), iteration))
    }
}

/// `{artifact}.timeout`
pub fn timeout_marker(artifact: &Path) -> PathBuf {
    with_suffix(artifact, "timeout")
}

/// `{artifact}.interrupted`
pub fn interrupted_path(artifact: &Path) -> PathBuf {
    with_suffix(artifact, "interrupted")
}

/// Derives the record of one trial from its artifacts.
///
/// 1. The primary log exists and the descriptor's parser accepts it: `Done`.
/// 2. Otherwise a timeout marker exists: `Timeout(seconds)`.
/// 3. Otherwise: `NotDone`. A log that exists but does not parse lands here too.
///
/// 从产物中推导单次试验的记录：日志可解析则为 `Done`；否则存在超时标记则为 `Timeout`；
/// 否则为 `NotDone`（存在但无法解析的日志也属于此类）。
pub fn get_status(
    descriptor: &ExperimentDescriptor,
    artifact: &Path,
) -> Result<RunRecord, StoreError> {
    let content = read_artifact(artifact).map_err(|source| StoreError::Unreadable {
        path: artifact.to_path_buf(),
        source,
    })?;

    // TODO: an unparseable log is retried forever; a distinct failed state would need an on-disk marker.
    if let Some(record) = content
        .and_then(|c| descriptor.parse(&c))
        .and_then(RunRecord::done)
    {
        return Ok(record);
    }

    let marker = timeout_marker(artifact);
    let stored = read_artifact(&marker).map_err(|source| StoreError::Unreadable {
        path: marker.clone(),
        source,
    })?;
    if let Some(content) = stored {
        let seconds = content
            .trim()
            .parse::<u64>()
            .map_err(|_| StoreError::CorruptMarker {
                path: marker,
                content,
            })?;
        return Ok(RunRecord::timeout(seconds));
    }

    Ok(RunRecord::not_done())
}

/// Removes the primary log and the timeout marker of a trial, if present.
pub fn clear_artifacts(artifact: &Path) -> io::Result<()> {
    remove_if_exists(artifact)?;
    remove_if_exists(&timeout_marker(artifact))?;
    Ok(())
}

/// Records that the trial exceeded `seconds`.
pub fn write_timeout_marker(artifact: &Path, seconds: u64) -> io::Result<()> {
    std::fs::write(timeout_marker(artifact), seconds.to_string())
}
