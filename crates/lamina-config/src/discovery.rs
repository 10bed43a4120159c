//! File-based config discovery for CLI use
//!
//! Handles finding and loading lamina configuration files from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::LaminaConfig;
use crate::error::{ConfigError, Result};

/// Conventional TOML config file name.
pub const CONFIG_FILE_NAME: &str = "lamina.toml";

/// Field of `package.json` that may hold the configuration.
pub const PACKAGE_JSON_FIELD: &str = "lamina";

/// File-based configuration discovery
///
/// Searches for lamina configuration files in conventional locations and loads them.
/// Library users should use `LaminaConfig::from_value()` directly.
///
/// # Example
///
/// ```no_run
/// use lamina_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let config = discovery.load().unwrap();
/// ```
#[derive(Debug)]
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a new config discovery with a root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. TOML config: lamina.toml
    /// 2. package.json (lamina field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(CONFIG_FILE_NAME);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed
                        .get(PACKAGE_JSON_FIELD)
                        .is_some_and(|field| !field.is_null())
                    {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from discovered file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found.
    pub fn load(&self) -> Result<LaminaConfig> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        load_from(&path)
    }
}

/// Load the raw configuration value from a specific file.
///
/// `package.json` yields its `lamina` field; any other file is parsed as TOML.
/// The CLI layers this value under environment and flag overrides.
pub fn load_value(path: &Path) -> Result<Value> {
    if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
        return load_package_json_value(path);
    }

    let content = fs::read_to_string(path)?;

    let toml_val: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("Invalid TOML syntax: {}", e)),
    })?;

    serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("TOML to JSON conversion failed: {}", e)),
    })
}

/// Load config from a specific file path
pub fn load_from(path: &Path) -> Result<LaminaConfig> {
    tracing::debug!(path = %path.display(), "loading config");
    LaminaConfig::from_value(load_value(path)?)
}

fn load_package_json_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {}", e)),
    })?;

    let value = parsed
        .get(PACKAGE_JSON_FIELD)
        .ok_or_else(|| ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some("Add a 'lamina' field to your package.json".to_string()),
        })?;

    if value.is_null() {
        return Err(ConfigError::InvalidValue {
            field: PACKAGE_JSON_FIELD.to_string(),
            hint: Some("The 'lamina' field cannot be null".to_string()),
        });
    }

    Ok(value.clone())
}

/// Discover and load config from current directory (convenience function)
pub fn discover() -> Result<LaminaConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
