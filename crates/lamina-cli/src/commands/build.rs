//! Build command implementation.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use lamina_bundler::BuildReport;
use lamina_config::{ConfigValidator, FsValidator};

use crate::cli::BuildArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the build command.
///
/// 1. Merge the config file, `LAMINA_*` variables and flags
/// 2. Validate the config, including that every entry exists
/// 3. Build all targets and print the summary
/// 4. Fail when any output was not written or nothing was written at all
///
/// Transform warnings and errors are reported but do not fail the build as
/// long as every output was produced.
pub fn execute(args: BuildArgs) -> Result<()> {
    let loaded = config::load_for_build(&args)?;
    let project_root = loaded.project_root();

    FsValidator::new(&project_root).validate(&loaded.config)?;

    ui::info(&format!(
        "Building {} target(s) from {}",
        loaded.config.targets.len(),
        loaded.source.display()
    ));

    let report = lamina_bundler::build(&loaded.config, &loaded.root);

    ui::print_build_summary(&report, &project_root);

    if let Some(path) = &args.report {
        write_report(&loaded.root.join(path), &report)?;
    }
    if args.json {
        print_report(&report)?;
    }

    if !report.is_success() {
        return Err(CliError::BuildFailed {
            failed: report.failed().count(),
            written: report.written().count(),
        });
    }

    ui::success(&format!(
        "Built {} artifact(s)",
        report.written().count()
    ));
    Ok(())
}

fn print_report(report: &BuildReport) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)?;
    writeln!(stdout)?;
    Ok(())
}

fn write_report(path: &Path, report: &BuildReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory {}", parent.display()))?;
    }
    fs::write(path, json)
        .with_context(|| format!("failed to write build report to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "wrote build report");
    Ok(())
}
