// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{TempDir, tempdir};

use sweep_runner::config::EngineSettings;
use sweep_runner::descriptor::ExperimentDescriptor;
use sweep_runner::parser::LogParser;
use sweep_runner::scheduler::Engine;

pub fn setup_outdir() -> TempDir {
    tempdir().expect("Failed to create temporary directory")
}

/// A descriptor running `script` through `sh -c`.
pub fn sh_descriptor(name: &str, script: &str) -> ExperimentDescriptor {
    ExperimentDescriptor::new(
        name,
        vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        LogParser::Mc,
    )
    .expect("valid descriptor")
}

/// A descriptor whose tool prints a complete log reporting `seconds`.
pub fn finishing_descriptor(name: &str, seconds: &str) -> ExperimentDescriptor {
    sh_descriptor(
        name,
        &format!("echo 'Time for computing the bisimulation relation: {seconds}'"),
    )
}

/// A complete tool log reporting `seconds`.
pub fn done_log(seconds: f64) -> String {
    format!("Time for computing the bisimulation relation: {seconds}\n")
}

/// Settings without a pause between trials.
pub fn settings(outdir: &Path, timeout_secs: u64) -> EngineSettings {
    EngineSettings::new(outdir, timeout_secs)
        .expect("positive timeout")
        .with_settle_delay(Duration::ZERO)
}

pub fn engine(outdir: &Path, timeout_secs: u64, descriptors: Vec<ExperimentDescriptor>) -> Engine {
    Engine::new(settings(outdir, timeout_secs), descriptors)
}

/// Writes a catalog file into `dir` and returns its path.
pub fn write_catalog(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("Sweep.toml");
    fs::write(&path, content).expect("Failed to write catalog");
    path
}

/// A one-family catalog storing its trials under `outdir`.
pub fn sample_catalog(outdir: &Path) -> String {
    format!(
        r#"
language = "en"
outdir = "{}"
timeout = 60
settle_secs = 0.0

[[families]]
name = "lts"
phases = ["tsig"]

[[families.models]]
name = "kanban01"
input = ["kanban01.bdd"]
states = 256

[[families.variants]]
name = "{{model}}-s-{{workers}}"
command = "sigrefmc {{input}} -w {{workers}}"
parser = "mc"
workers = [1, 2]

[[families.speedups]]
label = "Speedup"
numerator = "{{model}}-s-1"
denominator = "{{model}}-s-2"
"#,
        outdir.display()
    )
}
