//! Outcome of a build run.
//!
//! The report lists every artifact with its kind and size. It is what the CLI
//! summary prints and what deployment tooling reads to find artifact paths.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use lamina_config::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Plain,
    Archive,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Plain => write!(f, "plain"),
            OutputKind::Archive => write!(f, "archive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum OutputStatus {
    Written,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputReport {
    /// Absolute path of the artifact
    pub path: PathBuf,
    pub kind: OutputKind,
    pub format: OutputFormat,
    /// Bytes written (0 when the output failed)
    pub bytes: u64,
    pub status: OutputStatus,
}

impl OutputReport {
    pub fn written(path: PathBuf, kind: OutputKind, format: OutputFormat, bytes: u64) -> Self {
        Self {
            path,
            kind,
            format,
            bytes,
            status: OutputStatus::Written,
        }
    }

    pub fn failed(
        path: PathBuf,
        kind: OutputKind,
        format: OutputFormat,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path,
            kind,
            format,
            bytes: 0,
            status: OutputStatus::Failed(reason.into()),
        }
    }

    pub fn is_written(&self) -> bool {
        self.status == OutputStatus::Written
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub name: String,
    pub entry: PathBuf,
    pub outputs: Vec<OutputReport>,
    pub diagnostics: Diagnostics,
    /// Set when the target stopped before all of its outputs were attempted
    pub error: Option<String>,
    pub duration: Duration,
}

impl TargetReport {
    pub fn new(name: impl Into<String>, entry: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            entry: entry.into(),
            outputs: Vec::new(),
            diagnostics: Diagnostics::default(),
            error: None,
            duration: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.outputs.iter().all(OutputReport::is_written)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub targets: Vec<TargetReport>,
    pub duration: Duration,
}

impl BuildReport {
    /// A run succeeds when every output was written and at least one exists.
    ///
    /// Transform diagnostics, errors included, do not affect success.
    pub fn is_success(&self) -> bool {
        self.targets.iter().all(TargetReport::is_success) && self.written().next().is_some()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &OutputReport> {
        self.targets.iter().flat_map(|t| t.outputs.iter())
    }

    pub fn written(&self) -> impl Iterator<Item = &OutputReport> {
        self.outputs().filter(|o| o.is_written())
    }

    pub fn failed(&self) -> impl Iterator<Item = &OutputReport> {
        self.outputs().filter(|o| !o.is_written())
    }

    pub fn warning_count(&self) -> usize {
        self.targets.iter().map(|t| t.diagnostics.warnings.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.targets.iter().map(|t| t.diagnostics.errors.len()).sum()
    }

    pub fn total_bytes(&self) -> u64 {
        self.written().map(|o| o.bytes).sum()
    }
}
