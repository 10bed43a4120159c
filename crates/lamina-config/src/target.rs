//! Build target declarations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One declared unit of work: an entry module mapped to one or more artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Display name; defaults to the entry file stem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Entry module, relative to the project root
    pub entry: PathBuf,

    /// Ordered plugin chain
    #[serde(default)]
    pub plugins: Vec<PluginName>,

    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

impl TargetConfig {
    /// Name used in logs and reports.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.entry
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("target")
            .to_string()
    }
}

/// Where and how a target's bundle is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Output path; a `.zip` extension produces an archive
    pub file: PathBuf,

    /// Text written before the code of plain outputs (e.g. a shebang)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// Module format of the produced code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// ECMAScript modules
    #[default]
    #[serde(rename = "module", alias = "esm", alias = "es")]
    Module,
    /// CommonJS (`require` / `module.exports`)
    #[serde(rename = "commonjs", alias = "cjs")]
    CommonJs,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Module => write!(f, "module"),
            OutputFormat::CommonJs => write!(f, "commonjs"),
        }
    }
}

/// Built-in plugins a target can chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginName {
    /// Identity resolution + isolated bundle-and-minify transform
    Standalone,
    /// `*.json` modules become `export default <value>`
    Json,
}

impl std::fmt::Display for PluginName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginName::Standalone => write!(f, "standalone"),
            PluginName::Json => write!(f, "json"),
        }
    }
}
