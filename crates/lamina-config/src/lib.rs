//! Configuration for lamina build runs.
//!
//! A run is described by [`LaminaConfig`]: build-wide [`BuildSettings`] plus an
//! ordered list of [`TargetConfig`]s. The configuration is loaded once, validated,
//! and treated as read-only for the rest of the run.

pub mod config;
pub mod discovery;
pub mod error;
pub mod settings;
pub mod target;
pub mod validation;

pub use config::LaminaConfig;
pub use error::{ConfigError, Result};
pub use settings::{BuildSettings, DEFAULT_ARCHIVE_ENTRY, DEFAULT_EXTERNALS, Platform};
pub use target::{OutputConfig, OutputFormat, PluginName, TargetConfig};

pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery, discover, load_from, load_value};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
