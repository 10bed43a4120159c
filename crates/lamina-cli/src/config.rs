//! Layered configuration loading.
//!
//! Sources are merged with figment, later layers winning:
//!
//! 1. `BuildSettings` defaults
//! 2. the config file (`lamina.toml` or `package.json#lamina`)
//! 3. `LAMINA_*` environment variables (settings only)
//! 4. command-line flags
//!
//! `--external` values extend the merged externals instead of replacing them.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
use lamina_config::{BuildSettings, ConfigDiscovery, ConfigError, LaminaConfig};
use path_clean::PathClean;
use serde_json::{Map, Value, json};

use crate::cli::{BuildArgs, ConfigArgs};
use crate::error::{CliError, Result};

/// Prefix of environment variables that override build settings.
pub const ENV_PREFIX: &str = "LAMINA_";

/// Settings keys that may be set through the environment.
const ENV_SETTINGS: &[&str] = &[
    "externals",
    "platform",
    "minify",
    "sourcemap",
    "archive_entry",
    "parallel",
    "cwd",
];

/// A merged configuration together with where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: LaminaConfig,
    /// Directory the run was started from (`--cwd` or the process cwd)
    pub root: PathBuf,
    /// Config file that supplied the targets
    pub source: PathBuf,
}

impl LoadedConfig {
    /// Root that entries and outputs resolve against once `settings.cwd`
    /// is applied.
    pub fn project_root(&self) -> PathBuf {
        effective_root(&self.root, self.config.settings.cwd.as_deref())
    }
}

/// Load the configuration for `lamina check`: file and environment layers.
pub fn load(args: &ConfigArgs) -> Result<LoadedConfig> {
    load_layers(args, Value::Object(Map::new()), &[])
}

/// Load the configuration for `lamina build`, flags included.
pub fn load_for_build(args: &BuildArgs) -> Result<LoadedConfig> {
    load_layers(&args.config, flag_overrides(args), &args.externals)
}

fn load_layers(
    args: &ConfigArgs,
    flags: Value,
    extra_externals: &[String],
) -> Result<LoadedConfig> {
    let root = match &args.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir()?,
    };
    let source = locate(args.config.as_deref(), &root)?;
    tracing::debug!(path = %source.display(), "using config file");

    let file = lamina_config::load_value(&source)?;

    let figment = Figment::new()
        .merge(Serialized::default("settings", BuildSettings::default()))
        .merge(Serialized::defaults(file))
        .merge(settings_env())
        .merge(Serialized::defaults(flags));

    let mut config: LaminaConfig = figment.extract()?;

    for external in extra_externals {
        if !config.settings.externals.contains(external) {
            config.settings.externals.push(external.clone());
        }
    }

    Ok(LoadedConfig {
        config,
        root,
        source,
    })
}

/// `--config` wins; otherwise discover in the project directory.
fn locate(explicit: Option<&Path>, root: &Path) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            };
            if path.is_file() {
                Ok(path)
            } else {
                Err(CliError::ConfigFileNotFound(path))
            }
        }
        None => ConfigDiscovery::new(root)
            .find()
            .ok_or(CliError::Config(ConfigError::NotFound)),
    }
}

/// `LAMINA_MINIFY=false` becomes `settings.minify = false`.
fn settings_env() -> Env {
    Env::prefixed(ENV_PREFIX)
        .only(ENV_SETTINGS)
        .map(|key| format!("settings.{}", key.as_str().to_ascii_lowercase()).into())
}

/// Only flags the user actually passed end up in this layer.
fn flag_overrides(args: &BuildArgs) -> Value {
    let mut settings = Map::new();

    if let Some(minify) = args.minify_override() {
        settings.insert("minify".into(), json!(minify));
    }
    if args.sourcemap {
        settings.insert("sourcemap".into(), json!(true));
    }
    if args.parallel {
        settings.insert("parallel".into(), json!(true));
    }
    if let Some(platform) = args.platform {
        settings.insert(
            "platform".into(),
            json!(lamina_config::Platform::from(platform)),
        );
    }
    if let Some(entry) = &args.archive_entry {
        settings.insert("archive_entry".into(), json!(entry));
    }

    if settings.is_empty() {
        Value::Object(Map::new())
    } else {
        json!({ "settings": settings })
    }
}

/// `root` joined with `cwd`, normalized the same way the orchestrator does.
fn effective_root(root: &Path, cwd: Option<&Path>) -> PathBuf {
    match cwd {
        Some(cwd) => root.join(cwd).clean(),
        None => root.clean(),
    }
}
