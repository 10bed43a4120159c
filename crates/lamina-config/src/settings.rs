//! Build-wide settings shared by every target.
//!
//! These values used to come from ambient process state. They are now an
//! explicit struct, resolved once when the configuration is loaded and handed
//! to the orchestrator at construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Packages that are never inlined: provided by the hosting runtime, native,
/// or too heavy to bundle.
pub const DEFAULT_EXTERNALS: &[&str] = &["sharp", "next", "aws-cdk", "aws-sdk"];

/// Name of the single entry inside every produced archive.
pub const DEFAULT_ARCHIVE_ENTRY: &str = "index.js";

/// Runtime platform the standalone bundles are compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Node.js function handlers and command-line tools (default)
    #[default]
    Node,
    /// Browser bundles
    Browser,
    /// No platform-specific resolution or built-ins
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Package names kept as runtime `import`/`require` references
    #[serde(default = "default_externals")]
    pub externals: Vec<String>,

    #[serde(default)]
    pub platform: Platform,

    #[serde(default = "default_true")]
    pub minify: bool,

    /// Emit external source maps next to plain outputs
    #[serde(default)]
    pub sourcemap: bool,

    #[serde(default = "default_archive_entry")]
    pub archive_entry: String,

    /// Build independent targets concurrently
    #[serde(default)]
    pub parallel: bool,

    /// Project root used to resolve entries and outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            externals: default_externals(),
            platform: Platform::default(),
            minify: true,
            sourcemap: false,
            archive_entry: default_archive_entry(),
            parallel: false,
            cwd: None,
        }
    }
}

fn default_externals() -> Vec<String> {
    DEFAULT_EXTERNALS.iter().map(|s| s.to_string()).collect()
}

fn default_archive_entry() -> String {
    DEFAULT_ARCHIVE_ENTRY.to_string()
}

fn default_true() -> bool {
    true
}
