//! Command-line interface definition.
//!
//! - `lamina build` - build every target declared in the config
//! - `lamina check` - validate the config without building

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lamina_config::Platform;

/// Lamina - standalone bundles and function archives from one config
#[derive(Parser, Debug)]
#[command(
    name = "lamina",
    version,
    about = "Build standalone bundles and function archives from one config",
    long_about = "Lamina reads lamina.toml (or the \"lamina\" field of package.json) and\n\
                  builds every declared target into single-file bundles, compressed\n\
                  function archives, or both."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every target declared in the configuration
    Build(BuildArgs),

    /// Validate the configuration without building
    Check(CheckArgs),
}

/// Where the configuration lives.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a config file (lamina.toml or package.json)
    ///
    /// Defaults to lamina.toml, then the "lamina" field of package.json,
    /// in the project directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Minify generated code
    #[arg(long, overrides_with = "no_minify")]
    pub minify: bool,

    /// Emit readable, unminified code
    #[arg(long, overrides_with = "minify")]
    pub no_minify: bool,

    /// Write external source maps next to plain outputs
    #[arg(long)]
    pub sourcemap: bool,

    /// Build independent targets concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Runtime platform the bundles are compiled for
    #[arg(long, value_enum, value_name = "PLATFORM")]
    pub platform: Option<PlatformArg>,

    /// Additional package to keep external (repeatable)
    ///
    /// Added to the configured externals; a subpath such as
    /// `aws-sdk/clients/s3` is external when its package is.
    #[arg(short = 'e', long = "external", value_name = "PACKAGE")]
    pub externals: Vec<String>,

    /// Name of the single entry inside produced archives
    #[arg(long, value_name = "NAME")]
    pub archive_entry: Option<String>,

    /// Print the build report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Also write the build report as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl BuildArgs {
    /// `Some` only when one of the minify flags was given.
    pub fn minify_override(&self) -> Option<bool> {
        if self.minify {
            Some(true)
        } else if self.no_minify {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Skip filesystem checks (entry modules are not required to exist)
    #[arg(long)]
    pub schema_only: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    Node,
    Browser,
    Neutral,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Node => Platform::Node,
            PlatformArg::Browser => Platform::Browser,
            PlatformArg::Neutral => Platform::Neutral,
        }
    }
}
