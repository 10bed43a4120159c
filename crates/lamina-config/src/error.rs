//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors (for CLI use)
    #[error("entry module not found: {}", .path.display())]
    EntryNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error("config not found (looked for lamina.toml and a 'lamina' field in package.json)")]
    NotFound,

    #[error("invalid config value for '{field}'{}", .hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue {
        field: String,
        hint: Option<String>,
    },

    // Schema validation errors (no filesystem checks)
    #[error("no build targets specified")]
    NoTargets,

    #[error("target '{target}' declares no outputs")]
    NoOutputs { target: String },

    #[error("output '{}' is written by more than one build target", .path.display())]
    DuplicateOutput { path: PathBuf },

    #[error("schema validation failed: {message}")]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
