//! Error handling for the lamina CLI.
//!
//! Commands return [`CliError`]; `main` converts it into a `miette::Report`
//! with [`cli_error_to_miette`] so every failure prints with a hint.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or validating the configuration failed
    #[error(transparent)]
    Config(#[from] lamina_config::ConfigError),

    /// Layered configuration could not be merged or extracted
    #[error("failed to merge configuration sources: {0}")]
    Layering(#[from] Box<figment::Error>),

    /// The config file passed with `--config` does not exist
    #[error("config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    /// The run finished but at least one output was not written
    #[error("build failed: {failed} output(s) failed, {written} written")]
    BuildFailed { failed: usize, written: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Layering(Box::new(err))
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a [`CliError`] into a miette report carrying a help line.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Layering(e) => miette::miette!(
            code = "lamina::config::layering",
            help = "Check LAMINA_* environment variables and the value types in your config",
            "Configuration error: {}",
            e
        ),
        CliError::ConfigFileNotFound(path) => miette::miette!(
            code = "lamina::config::not_found",
            help = "Pass an existing file to --config, or omit it to use lamina.toml",
            "Config file not found: {}",
            path.display()
        ),
        CliError::BuildFailed { failed, written } => miette::miette!(
            code = "lamina::build::failed",
            help = "Re-run with --verbose for per-target diagnostics",
            "Build failed: {} output(s) failed, {} written",
            failed,
            written
        ),
        other => miette::miette!("{}", other),
    }
}

fn config_error_to_miette(err: lamina_config::ConfigError) -> miette::Report {
    use lamina_config::ConfigError;

    let help = match &err {
        ConfigError::NotFound => {
            "Create lamina.toml, add a \"lamina\" field to package.json, or pass --config"
        }
        ConfigError::EntryNotFound { .. } => "Check the 'entry' field of the target",
        ConfigError::NoTargets => "Declare at least one [[targets]] table",
        ConfigError::NoOutputs { .. } => "Add an [[targets.outputs]] table to the target",
        ConfigError::DuplicateOutput { .. } => "Give every output its own file path",
        ConfigError::InvalidValue { .. } | ConfigError::SchemaValidation { .. } => {
            "Fix the reported field and run `lamina check`"
        }
        ConfigError::Io(_) => "Check that the config file is readable",
    };

    miette::miette!(
        code = "lamina::config",
        help = help,
        "Configuration error: {}",
        err
    )
}
