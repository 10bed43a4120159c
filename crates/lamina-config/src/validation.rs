//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation (for library use).
//! Both run before any target is built; a failure rejects the whole run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::config::LaminaConfig;
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &LaminaConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use lamina_config::{ConfigValidator, LaminaConfig, SchemaValidator};
/// use serde_json::json;
///
/// let config = LaminaConfig::from_value(json!({
///     "targets": [{ "entry": "lib/index.ts", "outputs": [{ "file": "dist/index.js" }] }]
/// }))
/// .unwrap();
///
/// SchemaValidator.validate(&config).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &LaminaConfig) -> Result<()> {
        if config.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        for external in &config.settings.externals {
            if external.trim().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: "external package names cannot be empty".to_string(),
                    hint: Some("Remove empty strings from 'settings.externals'".to_string()),
                });
            }
        }

        let entry_name = config.settings.archive_entry.trim();
        if entry_name.is_empty() || entry_name.split(['/', '\\']).any(|part| part == "..") {
            return Err(ConfigError::SchemaValidation {
                message: format!("invalid archive entry name '{}'", config.settings.archive_entry),
                hint: Some("Use a plain file name such as 'index.js'".to_string()),
            });
        }

        let sourcemaps = config.settings.sourcemap;
        let mut seen_outputs: HashSet<PathBuf> = HashSet::new();
        for target in &config.targets {
            let name = target.display_name();

            if target.entry.as_os_str().is_empty() {
                return Err(ConfigError::SchemaValidation {
                    message: format!("target '{}' has an empty entry path", name),
                    hint: Some("Set 'entry' to the module the target bundles".to_string()),
                });
            }

            if target.outputs.is_empty() {
                return Err(ConfigError::NoOutputs { target: name });
            }

            let mut plugins = HashSet::new();
            for plugin in &target.plugins {
                if !plugins.insert(plugin) {
                    return Err(ConfigError::SchemaValidation {
                        message: format!("plugin '{}' appears twice in target '{}'", plugin, name),
                        hint: None,
                    });
                }
            }

            for output in &target.outputs {
                if output.file.as_os_str().is_empty() {
                    return Err(ConfigError::SchemaValidation {
                        message: format!("target '{}' has an output with an empty file path", name),
                        hint: Some("Every output needs a 'file'".to_string()),
                    });
                }
                for path in claimed_paths(&output.file, sourcemaps) {
                    if !seen_outputs.insert(path) {
                        return Err(ConfigError::DuplicateOutput {
                            path: output.file.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Normalized paths an output writes: the file itself, plus `<file>.map` for a
/// plain output when source maps are enabled.
fn claimed_paths(file: &Path, sourcemaps: bool) -> Vec<PathBuf> {
    let file = file.clean();
    let is_archive = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));

    let mut paths = Vec::with_capacity(2);
    if sourcemaps && !is_archive {
        let mut map = file.as_os_str().to_owned();
        map.push(".map");
        paths.push(PathBuf::from(map));
    }
    paths.push(file);
    paths
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that every entry module exists on disk.
#[derive(Debug, Clone)]
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    /// Create a new filesystem validator with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &LaminaConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for target in &config.targets {
            let path = self.root.join(&target.entry);
            if !path.is_file() {
                return Err(ConfigError::EntryNotFound { path });
            }
        }

        Ok(())
    }
}

/// Validate schema only (convenience function)
pub fn validate_schema(config: &LaminaConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Validate schema and entry files under `root` (convenience function)
pub fn validate_fs(config: &LaminaConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
