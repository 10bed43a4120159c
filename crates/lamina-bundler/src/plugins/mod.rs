//! Build plugins for lamina targets.
//!
//! A target's plugins form an ordered [`PluginChain`]. Each plugin declares the
//! hooks it implements through [`HookUsage`]; hooks it does not declare are
//! never called.
//! - `resolve_id`: first plugin returning `Some` wins
//! - `transform`: sequential fold over the chain
//! - `write_bundle`: notified after every written artifact

mod chain;
mod json;
mod standalone;

use std::fmt::Debug;
use std::path::Path;

pub use chain::{ChainOutput, PluginChain};
pub use json::JsonPlugin;
pub use rolldown_plugin::HookUsage;
pub use standalone::StandalonePlugin;

use crate::Result;
use crate::diagnostics::Diagnostics;
use crate::model::Bundle;
use crate::report::OutputReport;
use lamina_config::OutputFormat;

/// Input to a plugin's `transform` hook.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    pub code: &'a str,
    pub module_path: &'a Path,
    pub format: OutputFormat,
}

/// Result of a plugin's `transform` hook.
///
/// `code: None` means the transform produced nothing for this module.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub code: Option<String>,
    pub source_map: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Capability set of a build plugin.
///
/// Every hook has a no-op default; override the ones named in [`hook_usage`].
///
/// [`hook_usage`]: BuildPlugin::hook_usage
pub trait BuildPlugin: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn hook_usage(&self) -> HookUsage;

    fn resolve_id(&self, _specifier: &str, _importer: Option<&str>) -> Result<Option<String>> {
        Ok(None)
    }

    fn transform(&self, _ctx: &TransformContext<'_>) -> Result<Option<TransformOutput>> {
        Ok(None)
    }

    fn write_bundle(&self, _output: &OutputReport, _bundle: &Bundle) -> Result<()> {
        Ok(())
    }
}
