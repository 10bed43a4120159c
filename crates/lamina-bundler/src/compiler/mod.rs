//! The isolated module transform.
//!
//! [`ModuleCompiler`] is narrow and synchronous: one module's code in, one
//! bundle (or none) plus diagnostics out. [`RolldownCompiler`] runs a nested
//! Rolldown build per call.

mod nested;

use std::fmt::Debug;
use std::path::Path;

pub use nested::RolldownCompiler;

use crate::Result;
use crate::diagnostics::Diagnostics;
use crate::strategy::BundlingStrategy;
use lamina_config::OutputFormat;

/// One module to bundle and minify.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// Source of the module, already run through earlier plugins
    pub code: &'a str,
    /// Absolute path of the module; relative imports resolve from its directory
    pub module_path: &'a Path,
    pub format: OutputFormat,
    pub strategy: &'a BundlingStrategy,
}

#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    /// `None` when the compile produced no chunk
    pub code: Option<String>,
    pub source_map: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Synchronous bundle-and-minify of a single module.
///
/// Implementations must not share state between calls.
pub trait ModuleCompiler: Debug + Send + Sync {
    /// Compile one module.
    ///
    /// Build problems in the module belong in [`CompileOutput::diagnostics`];
    /// `Err` is reserved for failures of the compiler itself.
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput>;
}
