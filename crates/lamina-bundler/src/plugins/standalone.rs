//! Standalone plugin: identity resolution plus the isolated module transform.
//!
//! Resolution leaves every specifier untouched; the nested compile then
//! resolves and inlines the whole module graph in one pass, keeping only the
//! strategy's externals as runtime references.

use std::sync::Arc;

use super::{BuildPlugin, HookUsage, TransformContext, TransformOutput};
use crate::Result;
use crate::compiler::{CompileRequest, ModuleCompiler};
use crate::model::Bundle;
use crate::report::OutputReport;
use crate::strategy::BundlingStrategy;

#[derive(Debug, Clone)]
pub struct StandalonePlugin {
    strategy: Arc<BundlingStrategy>,
    compiler: Arc<dyn ModuleCompiler>,
}

impl StandalonePlugin {
    pub fn new(strategy: Arc<BundlingStrategy>, compiler: Arc<dyn ModuleCompiler>) -> Self {
        Self { strategy, compiler }
    }

    pub fn strategy(&self) -> &BundlingStrategy {
        &self.strategy
    }
}

impl BuildPlugin for StandalonePlugin {
    fn name(&self) -> &'static str {
        "standalone"
    }

    fn hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Transform | HookUsage::WriteBundle
    }

    fn resolve_id(&self, specifier: &str, importer: Option<&str>) -> Result<Option<String>> {
        Ok(self.strategy.resolve(specifier, importer))
    }

    fn transform(&self, ctx: &TransformContext<'_>) -> Result<Option<TransformOutput>> {
        let compiled = self.compiler.compile(&CompileRequest {
            code: ctx.code,
            module_path: ctx.module_path,
            format: ctx.format,
            strategy: &self.strategy,
        })?;

        Ok(Some(TransformOutput {
            code: compiled.code,
            source_map: compiled.source_map,
            diagnostics: compiled.diagnostics,
        }))
    }

    fn write_bundle(&self, output: &OutputReport, _bundle: &Bundle) -> Result<()> {
        tracing::info!(
            path = %output.path.display(),
            kind = %output.kind,
            bytes = output.bytes,
            "wrote artifact"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CompileOutput;
    use lamina_config::OutputFormat;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records the requests it sees and upper-cases the code.
    #[derive(Debug, Default)]
    struct Recording {
        seen: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl ModuleCompiler for Recording {
        fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput> {
            self.seen.lock().unwrap().push((
                request.module_path.display().to_string(),
                request.strategy.externals.clone(),
            ));
            Ok(CompileOutput {
                code: Some(request.code.to_uppercase()),
                ..Default::default()
            })
        }
    }

    #[test]
    fn resolution_is_identity() {
        let plugin = StandalonePlugin::new(
            Arc::new(BundlingStrategy::default()),
            Arc::new(Recording::default()),
        );
        assert_eq!(
            plugin.resolve_id("./lib/util", Some("/app/index.ts")).unwrap().as_deref(),
            Some("./lib/util")
        );
    }

    #[test]
    fn transform_delegates_to_compiler_with_shared_strategy() {
        let compiler = Arc::new(Recording::default());
        let strategy = Arc::new(BundlingStrategy {
            externals: vec!["sharp".to_string()],
            ..Default::default()
        });
        let plugin = StandalonePlugin::new(Arc::clone(&strategy), compiler.clone());

        let out = plugin
            .transform(&TransformContext {
                code: "export const a = 1;",
                module_path: Path::new("/app/lib/handler.ts"),
                format: OutputFormat::Module,
            })
            .unwrap()
            .unwrap();

        assert_eq!(out.code.as_deref(), Some("EXPORT CONST A = 1;"));
        let seen = compiler.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "/app/lib/handler.ts");
        assert_eq!(seen[0].1, vec!["sharp"]);
    }
}
