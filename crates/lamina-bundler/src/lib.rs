//! # lamina-bundler
//!
//! Multi-target build pipeline for serverless artifacts.
//!
//! For each declared build target the [`Orchestrator`] resolves the entry module
//! through the target's [`PluginChain`], runs the isolated bundle-and-minify
//! transform (a nested Rolldown build behind [`ModuleCompiler`]) and writes the
//! resulting [`Bundle`] as a plain file or as a single-entry zip [`Archive`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use lamina_bundler::{Orchestrator, RolldownCompiler};
//! use lamina_config::ConfigDiscovery;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigDiscovery::new(".").load()?;
//! let orchestrator = Orchestrator::from_config(&config, ".", Arc::new(RolldownCompiler));
//!
//! let report = orchestrator.run();
//! for output in report.written() {
//!     println!("{} ({} bytes)", output.path.display(), output.bytes);
//! }
//! # Ok(()) }
//! ```

pub mod archive;
pub mod compiler;
pub mod diagnostics;
pub mod model;
pub mod orchestrator;
pub mod output;
pub mod plugins;
pub mod report;
pub mod strategy;

pub use archive::{ARCHIVE_EXTENSION, Archive, is_archive_path, pack};
pub use compiler::{CompileOutput, CompileRequest, ModuleCompiler, RolldownCompiler};
pub use diagnostics::{DiagnosticKind, DiagnosticSeverity, Diagnostics, ExtractedDiagnostic};
pub use model::{BuildTarget, Bundle, OutputDescriptor};
pub use orchestrator::{Orchestrator, build};
pub use plugins::{
    BuildPlugin, HookUsage, JsonPlugin, PluginChain, StandalonePlugin, TransformContext,
    TransformOutput,
};
pub use report::{BuildReport, OutputKind, OutputReport, OutputStatus, TargetReport};
pub use strategy::{BundlingStrategy, Resolution};

pub use lamina_config::{BuildSettings, OutputFormat, Platform};

/// Error types for lamina-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from Rolldown bundler.
    #[error("Rolldown bundler error: {}", format_bundler_error(.0))]
    Bundler(Vec<diagnostics::ExtractedDiagnostic>),

    /// The nested compile produced more than one chunk.
    #[error("expected exactly one chunk for '{module}', Rolldown produced {count}")]
    MultipleChunks { module: String, count: usize },

    /// The transform produced no code for a module.
    #[error("no bundle produced for '{module}'")]
    EmptyBundle { module: String },

    /// A build plugin rejected its input.
    #[error("plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Zip encoding failed.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Result type alias for lamina-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error from a Rolldown error.
    ///
    /// Extracts structured diagnostics from Rolldown's error types.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(diagnostics::extract_from_rolldown_error(error))
    }

    /// Faults that leave the output location unusable for the rest of a target.
    pub fn is_filesystem_fault(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::IoError { .. } | Error::InvalidOutputPath(_) | Error::WriteFailure(_)
        )
    }
}

/// Format bundler error diagnostics for display.
fn format_bundler_error(diagnostics: &[diagnostics::ExtractedDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [diag] => format!("{}: {}", diag.kind, diag.message),
        _ => format!(
            "{} errors: {}",
            diagnostics.len(),
            diagnostics
                .iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler(_) => "BUNDLER_ERROR",
            Error::MultipleChunks { .. } => "MULTIPLE_CHUNKS",
            Error::EmptyBundle { .. } => "EMPTY_BUNDLE",
            Error::Plugin { .. } => "PLUGIN_ERROR",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Io(_) | Error::IoError { .. } => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::Archive(_) => "ARCHIVE_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::MultipleChunks { .. } => Some(Box::new(
                "Dynamic imports are inlined into the entry chunk. Check for plugins that emit extra chunks.",
            )),
            Error::EmptyBundle { .. } => Some(Box::new(
                "The transform reported errors or produced no code. See the logged diagnostics for this target.",
            )),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it's within the project directory and doesn't contain '..' components.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::Bundler(diagnostics) => {
                if diagnostics.len() == 1 {
                    diagnostics[0]
                        .help
                        .as_ref()
                        .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>)
                } else {
                    Some(Box::new(
                        "Multiple bundler errors occurred. See details below.".to_string(),
                    ))
                }
            }
            _ => None,
        }
    }
}
