//! # Commands Module / 命令模块
//!
//! Implementations of the `run`, `report` and `init` subcommands, plus the
//! catalog loading they share.
//!
//! `run`、`report` 和 `init` 子命令的实现，以及它们共享的目录加载逻辑。

pub mod init;
pub mod report;
pub mod run;

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::config::{Catalog, load_catalog};
use crate::core::descriptor::{ExperimentDescriptor, build_descriptors};
use crate::t;

/// A loaded catalog, its expanded descriptors and the active locale.
pub struct Session {
    pub catalog: Catalog,
    pub descriptors: Vec<ExperimentDescriptor>,
    pub locale: String,
}

/// Picks the requested locale: the command line, then the catalog, then the
/// system, then `en`.
///
/// 选择请求的语言：命令行、目录、系统，最后是 `en`。
pub fn requested_locale(
    explicit: Option<&str>,
    catalog: Option<&str>,
    system: Option<String>,
) -> String {
    explicit
        .or(catalog)
        .map(str::to_string)
        .or(system)
        .unwrap_or_else(|| "en".to_string())
}

/// Loads the catalog at `path` and expands it, then activates the locale
/// chosen by [`requested_locale`].
///
/// 加载 `path` 处的目录并展开，然后启用 [`requested_locale`] 选出的语言。
pub fn load_session(path: &Path, lang: Option<&str>) -> Result<Session> {
    let catalog = load_catalog(path)?;
    let requested = requested_locale(lang, catalog.language.as_deref(), sys_locale::get_locale());
    crate::set_language(&requested);
    let locale = rust_i18n::locale().to_string();

    let descriptors = build_descriptors(&catalog).with_context(|| {
        t!("config_invalid", locale = &locale, path = path.display()).to_string()
    })?;

    Ok(Session {
        catalog,
        descriptors,
        locale,
    })
}
