//! Lamina CLI - one config, many standalone bundles and function archives.
//!
//! The crate exposes the pieces behind the `lamina` binary:
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `build` and `check` implementations
//! - [`config`] - layered configuration loading (file, environment, flags)
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines and the build summary
//!
//! # Example
//!
//! ```rust,no_run
//! use lamina_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
