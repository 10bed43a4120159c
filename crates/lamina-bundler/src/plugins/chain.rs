//! Ordered plugin chain for a build target.

use std::path::Path;
use std::sync::Arc;

use lamina_config::{OutputFormat, PluginName};

use super::{BuildPlugin, HookUsage, JsonPlugin, StandalonePlugin, TransformContext};
use crate::Result;
use crate::compiler::ModuleCompiler;
use crate::diagnostics::Diagnostics;
use crate::model::Bundle;
use crate::report::OutputReport;
use crate::strategy::BundlingStrategy;

/// Folded result of running every transform hook in the chain.
#[derive(Debug, Clone, Default)]
pub struct ChainOutput {
    pub code: Option<String>,
    pub source_map: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Plugins of one target, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Arc<dyn BuildPlugin>>,
}

impl PluginChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate built-in plugins by name.
    ///
    /// Every standalone plugin shares `strategy`, so all modules of a target are
    /// compiled against the same externals list. The nested compile always
    /// runs: when `standalone` is not named it is appended as the last plugin.
    pub fn from_names(
        names: &[PluginName],
        strategy: &Arc<BundlingStrategy>,
        compiler: &Arc<dyn ModuleCompiler>,
    ) -> Self {
        let standalone =
            || StandalonePlugin::new(Arc::clone(strategy), Arc::clone(compiler));

        let mut chain = Self::new();
        for name in names {
            match name {
                PluginName::Standalone => chain.push(standalone()),
                PluginName::Json => chain.push(JsonPlugin),
            }
        }
        if !names.contains(&PluginName::Standalone) {
            chain.push(standalone());
        }
        chain
    }

    pub fn push<P: BuildPlugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Arc::new(plugin));
    }

    pub fn with<P: BuildPlugin + 'static>(mut self, plugin: P) -> Self {
        self.push(plugin);
        self
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.iter().map(|p| p.name())
    }

    /// Whether any plugin declares a transform hook.
    pub fn has_transform(&self) -> bool {
        self.using(HookUsage::Transform).next().is_some()
    }

    fn using(&self, hook: HookUsage) -> impl Iterator<Item = &Arc<dyn BuildPlugin>> {
        self.plugins
            .iter()
            .filter(move |p| p.hook_usage().contains(hook))
    }

    /// Resolve a specifier; the first plugin returning `Some` wins.
    pub fn resolve_id(&self, specifier: &str, importer: Option<&str>) -> Result<Option<String>> {
        for plugin in self.using(HookUsage::ResolveId) {
            if let Some(resolved) = plugin.resolve_id(specifier, importer)? {
                tracing::trace!(plugin = plugin.name(), specifier, %resolved, "resolved");
                return Ok(Some(resolved));
            }
        }
        Ok(None)
    }

    /// Run every transform hook in order, each one seeing the previous output.
    ///
    /// The orchestrator never calls this on a chain without transform hooks;
    /// such a chain would return the source unchanged.
    pub fn transform(
        &self,
        code: &str,
        module_path: &Path,
        format: OutputFormat,
    ) -> Result<ChainOutput> {
        let mut output = ChainOutput {
            code: Some(code.to_string()),
            ..Default::default()
        };

        for plugin in self.using(HookUsage::Transform) {
            let Some(current) = output.code.as_deref() else {
                break;
            };
            let ctx = TransformContext {
                code: current,
                module_path,
                format,
            };
            if let Some(transformed) = plugin.transform(&ctx)? {
                tracing::debug!(
                    plugin = plugin.name(),
                    module = %module_path.display(),
                    produced = transformed.code.is_some(),
                    "transformed"
                );
                output.diagnostics.extend(transformed.diagnostics);
                if transformed.source_map.is_some() {
                    output.source_map = transformed.source_map;
                }
                output.code = transformed.code;
            }
        }

        Ok(output)
    }

    /// Notify every plugin that an artifact was written.
    pub fn write_bundle(&self, output: &OutputReport, bundle: &Bundle) -> Result<()> {
        for plugin in self.using(HookUsage::WriteBundle) {
            plugin.write_bundle(output, bundle)?;
        }
        Ok(())
    }
}
