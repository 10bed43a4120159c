//! Nested Rolldown build serving one module from memory.
//!
//! The entry module is virtual: its id is the module's real path, but its
//! content comes from the transform input. Relative imports therefore resolve
//! from the module's directory while the source on disk is never re-read.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rolldown::{
    BundlerBuilder as RolldownBundlerBuilder, BundlerOptions, InputItem, IsExternal,
    OutputFormat as RolldownFormat, Platform as RolldownPlatform, RawMinifyOptions,
    ResolveOptions, SourceMapType,
};
use rolldown_common::{ModuleType, Output, ResolvedExternal};
use rolldown_plugin::{
    __inner::SharedPluginable, HookLoadArgs, HookLoadOutput, HookLoadReturn, HookResolveIdArgs,
    HookResolveIdOutput, HookResolveIdReturn, HookUsage, Plugin, PluginContext,
};

use super::{CompileOutput, CompileRequest, ModuleCompiler};
use crate::diagnostics::{self, Diagnostics};
use crate::strategy::BundlingStrategy;
use crate::{Error, Result};
use lamina_config::{OutputFormat, Platform};

/// [`ModuleCompiler`] backed by an in-process Rolldown build.
///
/// Every call owns a fresh current-thread runtime, so calls share nothing and
/// may run from any thread, including rayon workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolldownCompiler;

impl ModuleCompiler for RolldownCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::IoError {
                message: "Failed to start the compile runtime".to_string(),
                source: e,
            })?;

        runtime.block_on(compile_module(request))
    }
}

async fn compile_module(request: &CompileRequest<'_>) -> Result<CompileOutput> {
    let module_id = request.module_path.to_string_lossy().into_owned();
    let cwd = request.module_path.parent().map(Path::to_path_buf);
    let strategy = request.strategy;

    let options = BundlerOptions {
        input: Some(vec![InputItem {
            name: None,
            import: module_id.clone(),
        }]),
        cwd: cwd.clone(),
        format: Some(match request.format {
            OutputFormat::Module => RolldownFormat::Esm,
            OutputFormat::CommonJs => RolldownFormat::Cjs,
        }),
        platform: Some(match strategy.platform {
            Platform::Node => RolldownPlatform::Node,
            Platform::Browser => RolldownPlatform::Browser,
            Platform::Neutral => RolldownPlatform::Neutral,
        }),
        minify: Some(RawMinifyOptions::from(strategy.minify)),
        external: Some(IsExternal::from(strategy.externals.clone())),
        inline_dynamic_imports: Some(true),
        sourcemap: strategy.sourcemap.then_some(SourceMapType::File),
        resolve: Some(configure_resolution(cwd.as_deref(), strategy.platform)),
        ..Default::default()
    };

    let entry_plugin: SharedPluginable = Arc::new(EntrySourcePlugin {
        module_id: module_id.clone(),
        code: Arc::from(request.code),
        strategy: Arc::new(strategy.clone()),
    });

    let mut bundler = RolldownBundlerBuilder::default()
        .with_options(options)
        .with_plugins(vec![entry_plugin])
        .build()
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    let mut diagnostics = Diagnostics::default();

    let bundle = match bundler.generate().await {
        Ok(bundle) => bundle,
        Err(e) => {
            diagnostics
                .errors
                .extend(diagnostics::extract_from_rolldown_error(&e));
            return Ok(CompileOutput {
                code: None,
                source_map: None,
                diagnostics,
            });
        }
    };

    for warning in &bundle.warnings {
        diagnostics.push(diagnostics::extract_warning(warning));
    }

    let chunks: Vec<_> = bundle
        .assets
        .iter()
        .filter_map(|output| match output {
            Output::Chunk(chunk) => Some(chunk),
            Output::Asset(_) => None,
        })
        .collect();

    match chunks.as_slice() {
        [] => Ok(CompileOutput {
            code: None,
            source_map: None,
            diagnostics,
        }),
        [chunk] => Ok(CompileOutput {
            code: Some(chunk.code.to_string()),
            source_map: chunk.map.as_ref().map(|map| map.to_json_string()),
            diagnostics,
        }),
        many => Err(Error::MultipleChunks {
            module: module_id,
            count: many.len(),
        }),
    }
}

/// Module resolution for the nested build, searching `node_modules` upwards
/// from the module's directory.
fn configure_resolution(cwd: Option<&Path>, platform: Platform) -> ResolveOptions {
    let mut modules = Vec::new();
    let mut current = cwd;
    while let Some(dir) = current {
        modules.push(dir.join("node_modules").to_string_lossy().to_string());
        current = dir.parent();
    }
    modules.push("node_modules".to_string());

    let (conditions, main_fields): (&[&str], &[&str]) = match platform {
        Platform::Node => (&["node", "import", "require", "default"], &["module", "main"]),
        Platform::Browser => (
            &["browser", "import", "default"],
            &["browser", "module", "main"],
        ),
        Platform::Neutral => (&["import", "default"], &["module", "main"]),
    };

    ResolveOptions {
        main_fields: Some(main_fields.iter().map(|s| s.to_string()).collect()),
        condition_names: Some(conditions.iter().map(|s| s.to_string()).collect()),
        extensions: Some(
            [".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs", ".json"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

/// Serves the transform input as the entry module and marks externals.
#[derive(Debug)]
struct EntrySourcePlugin {
    module_id: String,
    code: Arc<str>,
    strategy: Arc<BundlingStrategy>,
}

impl Plugin for EntrySourcePlugin {
    fn name(&self) -> Cow<'static, str> {
        "lamina-entry-source".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::ResolveId | HookUsage::Load
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let is_entry = specifier == self.module_id;
        let is_external = !is_entry && self.strategy.is_external(&specifier);

        async move {
            if is_entry || is_external {
                return Ok(Some(HookResolveIdOutput {
                    id: specifier.into(),
                    external: Some(ResolvedExternal::Bool(is_external)),
                    ..Default::default()
                }));
            }

            // Everything else goes through Rolldown's resolver
            Ok(None)
        }
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let served = (args.id == self.module_id).then(|| Arc::clone(&self.code));
        let module_type = infer_module_type(&self.module_id, &self.code);

        async move {
            let Some(code) = served else {
                return Ok(None);
            };

            Ok(Some(HookLoadOutput {
                code: code.to_string().into(),
                module_type: Some(module_type),
                ..Default::default()
            }))
        }
    }
}

/// Infers module type from file extension.
///
/// A `.json` entry that an earlier plugin already turned into JavaScript is
/// loaded as JavaScript.
fn infer_module_type(id: &str, code: &str) -> ModuleType {
    match PathBuf::from(id).extension().and_then(|e| e.to_str()) {
        Some("tsx") => ModuleType::Tsx,
        Some("ts") | Some("mts") | Some("cts") => ModuleType::Ts,
        Some("jsx") => ModuleType::Jsx,
        Some("json") if serde_json::from_str::<serde_json::Value>(code).is_ok() => {
            ModuleType::Json
        }
        _ => ModuleType::Js,
    }
}
