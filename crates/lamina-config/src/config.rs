//! Top-level configuration structure for lamina.
//!
//! For file discovery, see the `discovery` module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result as ConfigResult};
use crate::settings::BuildSettings;
use crate::target::TargetConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaminaConfig {
    #[serde(default)]
    pub settings: BuildSettings,

    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl LaminaConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use lamina_config::LaminaConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let value = json!({
    ///     "targets": [{
    ///         "entry": "lib/cli.ts",
    ///         "plugins": ["standalone"],
    ///         "outputs": [{ "file": "dist/cli.js", "banner": "#!/usr/bin/env node" }]
    ///     }]
    /// });
    ///
    /// let config = LaminaConfig::from_value(value).unwrap();
    /// assert_eq!(config.targets[0].entry, PathBuf::from("lib/cli.ts"));
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }
}
