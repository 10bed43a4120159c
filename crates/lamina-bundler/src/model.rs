//! Build targets, output descriptors and bundles.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lamina_config::{OutputConfig, OutputFormat, TargetConfig};

use crate::archive::is_archive_path;
use crate::compiler::ModuleCompiler;
use crate::plugins::PluginChain;
use crate::strategy::BundlingStrategy;

/// One unit of work: an entry module mapped to one or more artifacts.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone)]
pub struct BuildTarget {
    pub name: String,
    /// Entry module, relative to the project root
    pub entry: PathBuf,
    pub plugins: PluginChain,
    pub outputs: Vec<OutputDescriptor>,
}

impl BuildTarget {
    pub fn new(name: impl Into<String>, entry: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            entry: entry.into(),
            plugins: PluginChain::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_plugins(mut self, plugins: PluginChain) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_output(mut self, output: OutputDescriptor) -> Self {
        self.outputs.push(output);
        self
    }

    /// Build a target from its configuration, wiring every plugin to the
    /// shared strategy and compiler.
    pub fn from_config(
        config: &TargetConfig,
        strategy: &Arc<BundlingStrategy>,
        compiler: &Arc<dyn ModuleCompiler>,
    ) -> Self {
        Self {
            name: config.display_name(),
            entry: config.entry.clone(),
            plugins: PluginChain::from_names(&config.plugins, strategy, compiler),
            outputs: config.outputs.iter().map(OutputDescriptor::from).collect(),
        }
    }
}

/// Where and how one artifact of a target is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDescriptor {
    pub format: OutputFormat,
    pub file: PathBuf,
    pub banner: Option<String>,
}

impl OutputDescriptor {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            format: OutputFormat::default(),
            file: file.into(),
            banner: None,
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    /// Archive outputs are selected by the `.zip` extension.
    pub fn is_archive(&self) -> bool {
        is_archive_path(&self.file)
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl From<&OutputConfig> for OutputDescriptor {
    fn from(config: &OutputConfig) -> Self {
        Self {
            format: config.format,
            file: config.file.clone(),
            banner: config.banner.clone(),
        }
    }
}

/// The single self-contained code string produced for a target's entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub code: String,
    pub source_map: Option<String>,
}

impl Bundle {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            source_map: None,
        }
    }
}
