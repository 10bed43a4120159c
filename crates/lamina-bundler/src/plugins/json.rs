//! `*.json` modules as JavaScript.

use super::{BuildPlugin, HookUsage, TransformContext, TransformOutput};
use crate::{Error, Result};
use lamina_config::OutputFormat;

/// Turns a JSON module into a module whose default export is the parsed value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPlugin;

impl BuildPlugin for JsonPlugin {
    fn name(&self) -> &'static str {
        "json"
    }

    fn hook_usage(&self) -> HookUsage {
        HookUsage::Transform
    }

    fn transform(&self, ctx: &TransformContext<'_>) -> Result<Option<TransformOutput>> {
        let is_json = ctx
            .module_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Ok(None);
        }

        let value: serde_json::Value =
            serde_json::from_str(ctx.code).map_err(|e| Error::Plugin {
                plugin: self.name().to_string(),
                message: format!("{}: {}", ctx.module_path.display(), e),
            })?;

        let code = match ctx.format {
            OutputFormat::Module => format!("export default {};\n", value),
            OutputFormat::CommonJs => format!("module.exports = {};\n", value),
        };

        Ok(Some(TransformOutput {
            code: Some(code),
            ..Default::default()
        }))
    }
}
