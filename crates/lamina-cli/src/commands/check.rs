//! Check command implementation.
//!
//! Validates the configuration without building.

use lamina_config::{ConfigValidator, FsValidator, SchemaValidator};

use crate::cli::CheckArgs;
use crate::config;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Runs the schema rules (targets, outputs, unique output files, archive entry
/// name) and, unless `--schema-only` is given, verifies that every entry
/// module exists.
pub fn execute(args: CheckArgs) -> Result<()> {
    let loaded = config::load(&args.config)?;
    ui::info(&format!("Checking {}", loaded.source.display()));

    if args.schema_only {
        SchemaValidator.validate(&loaded.config)?;
    } else {
        FsValidator::new(loaded.project_root()).validate(&loaded.config)?;
    }

    for target in &loaded.config.targets {
        let outputs: Vec<_> = target
            .outputs
            .iter()
            .map(|o| o.file.display().to_string())
            .collect();
        ui::success(&format!(
            "{} ({}) -> {}",
            target.display_name(),
            target.entry.display(),
            outputs.join(", ")
        ));
    }

    ui::success("Configuration is valid");
    Ok(())
}
