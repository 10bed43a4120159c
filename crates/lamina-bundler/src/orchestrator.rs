//! Build target orchestration.
//!
//! For each target, in declaration order, and each of its outputs:
//! 1. obtain the bundle: resolve the entry through the plugin chain, read it,
//!    run the transform chain (once per output format)
//! 2. archive outputs go through the archive packager
//! 3. plain outputs get `banner` + newline + code
//! 4. every plugin's `write_bundle` hook is notified
//!
//! Transform diagnostics are logged and recorded, never fatal. A missing bundle
//! fails only the affected output; a filesystem fault stops the rest of that
//! target. Other targets always run.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use lamina_config::{BuildSettings, LaminaConfig, OutputFormat};
use path_clean::PathClean;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::archive;
use crate::compiler::{ModuleCompiler, RolldownCompiler};
use crate::diagnostics::Diagnostics;
use crate::model::{BuildTarget, Bundle, OutputDescriptor};
use crate::output::writer;
use crate::report::{BuildReport, OutputKind, OutputReport, TargetReport};
use crate::strategy::BundlingStrategy;
use crate::{Error, Result};

/// Drives every build target of a run.
///
/// Settings are fixed at construction; nothing is read from the process
/// environment while targets build.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    root: PathBuf,
    settings: BuildSettings,
    targets: Vec<BuildTarget>,
}

impl Orchestrator {
    /// Create an orchestrator rooted at `root`.
    ///
    /// `settings.cwd`, when set, is resolved against `root` and replaces it.
    pub fn new(root: impl AsRef<Path>, settings: BuildSettings) -> Self {
        let root = match &settings.cwd {
            Some(cwd) => root.as_ref().join(cwd).clean(),
            None => root.as_ref().clean(),
        };
        Self {
            root,
            settings,
            targets: Vec::new(),
        }
    }

    /// Build an orchestrator for every target of a loaded configuration.
    ///
    /// All standalone plugins share one [`BundlingStrategy`] derived from the
    /// configuration's settings.
    pub fn from_config(
        config: &LaminaConfig,
        root: impl AsRef<Path>,
        compiler: Arc<dyn ModuleCompiler>,
    ) -> Self {
        let strategy = Arc::new(BundlingStrategy::from_settings(&config.settings));
        let mut orchestrator = Self::new(root, config.settings.clone());
        for target in &config.targets {
            orchestrator.add_target(BuildTarget::from_config(target, &strategy, &compiler));
        }
        orchestrator
    }

    pub fn add_target(&mut self, target: BuildTarget) {
        self.targets.push(target);
    }

    pub fn with_target(mut self, target: BuildTarget) -> Self {
        self.add_target(target);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Build every target and report the outcome.
    ///
    /// Reports are in declaration order whether or not targets ran in parallel.
    pub fn run(&self) -> BuildReport {
        let start = Instant::now();
        tracing::info!(
            targets = self.targets.len(),
            parallel = self.settings.parallel,
            root = %self.root.display(),
            "starting build"
        );

        let targets = if self.settings.parallel {
            self.targets
                .par_iter()
                .map(|target| self.build_target(target))
                .collect()
        } else {
            self.targets
                .iter()
                .map(|target| self.build_target(target))
                .collect()
        };

        let report = BuildReport {
            targets,
            duration: start.elapsed(),
        };

        tracing::info!(
            written = report.written().count(),
            failed = report.failed().count(),
            warnings = report.warning_count(),
            errors = report.error_count(),
            "build finished"
        );

        report
    }

    /// Build one target; never panics and never fails the other targets.
    pub fn build_target(&self, target: &BuildTarget) -> TargetReport {
        let start = Instant::now();
        let span = tracing::info_span!("target", name = %target.name);
        let _guard = span.enter();

        let mut report = TargetReport::new(&target.name, &target.entry);
        let mut bundles: FxHashMap<OutputFormat, Option<Arc<Bundle>>> = FxHashMap::default();

        for output in &target.outputs {
            let bundle = match bundles.get(&output.format) {
                Some(bundle) => bundle.clone(),
                None => match self.bundle(target, output.format, &mut report.diagnostics) {
                    Ok(bundle) => {
                        let bundle = bundle.map(Arc::new);
                        bundles.insert(output.format, bundle.clone());
                        bundle
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "target aborted");
                        report.error = Some(err.to_string());
                        break;
                    }
                },
            };

            match self.emit_output(target, output, bundle.as_deref()) {
                Ok(written) => report.outputs.push(written),
                Err((failed, err)) => {
                    tracing::error!(path = %failed.path.display(), error = %err, "output failed");
                    report.outputs.push(failed);
                    if err.is_filesystem_fault() {
                        report.error = Some(err.to_string());
                        break;
                    }
                }
            }
        }

        report.duration = start.elapsed();
        report
    }

    /// Resolve, read and transform a target's entry for one output format.
    ///
    /// `Ok(None)` means the transform chain produced no code. A chain without
    /// any transform hook is rejected rather than copying the source.
    fn bundle(
        &self,
        target: &BuildTarget,
        format: OutputFormat,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Bundle>> {
        if !target.plugins.has_transform() {
            return Err(Error::InvalidConfig(format!(
                "target '{}' has no plugin that transforms its entry",
                target.name
            )));
        }

        let specifier = target.entry.to_string_lossy();
        let resolved = target
            .plugins
            .resolve_id(&specifier, None)?
            .map(PathBuf::from)
            .unwrap_or_else(|| target.entry.clone());
        let module_path = self.root.join(resolved).clean();

        let code = fs::read_to_string(&module_path).map_err(|e| Error::IoError {
            message: format!("Failed to read entry module '{}': {}", module_path.display(), e),
            source: e,
        })?;

        let output = target.plugins.transform(&code, &module_path, format)?;
        log_diagnostics(&target.name, &module_path, &output.diagnostics);
        diagnostics.extend(output.diagnostics);

        Ok(output
            .code
            .filter(|code| !code.is_empty())
            .map(|code| Bundle {
                code,
                source_map: output.source_map,
            }))
    }

    /// Write one output. On failure the error comes back with the report entry
    /// that records it.
    fn emit_output(
        &self,
        target: &BuildTarget,
        output: &OutputDescriptor,
        bundle: Option<&Bundle>,
    ) -> std::result::Result<OutputReport, (OutputReport, Error)> {
        let kind = if output.is_archive() {
            OutputKind::Archive
        } else {
            OutputKind::Plain
        };
        let unresolved = self.root.join(&output.file);
        let fail = |path: PathBuf, err: Error| {
            (
                OutputReport::failed(path, kind, output.format, err.to_string()),
                err,
            )
        };

        let path = writer::resolve_output_path(&self.root, &output.file)
            .map_err(|e| fail(unresolved, e))?;

        let Some(bundle) = bundle else {
            let err = Error::EmptyBundle {
                module: target.entry.display().to_string(),
            };
            return Err(fail(path, err));
        };

        let written = match kind {
            OutputKind::Archive => archive::pack(&self.settings.archive_entry, &bundle.code)
                .and_then(|archive| writer::write_archive(&path, &archive)),
            OutputKind::Plain => writer::write_plain(&path, output.banner.as_deref(), bundle),
        };
        let bytes = written.map_err(|e| fail(path.clone(), e))?;

        let report = OutputReport::written(path, kind, output.format, bytes);
        if let Err(err) = target.plugins.write_bundle(&report, bundle) {
            tracing::warn!(path = %report.path.display(), error = %err, "write_bundle hook failed");
        }
        Ok(report)
    }
}

fn log_diagnostics(target: &str, module: &Path, diagnostics: &Diagnostics) {
    for error in &diagnostics.errors {
        tracing::error!(target_name = target, module = %module.display(), "{}", error);
    }
    for warning in &diagnostics.warnings {
        tracing::warn!(target_name = target, module = %module.display(), "{}", warning);
    }
}

/// Build every target of `config` with the Rolldown compiler.
///
/// Convenience wrapper around [`Orchestrator::from_config`] and [`Orchestrator::run`].
pub fn build(config: &LaminaConfig, root: impl AsRef<Path>) -> BuildReport {
    Orchestrator::from_config(config, root, Arc::new(RolldownCompiler)).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileOutput, CompileRequest};
    use crate::diagnostics::{DiagnosticKind, DiagnosticSeverity, ExtractedDiagnostic};
    use crate::plugins::{PluginChain, StandalonePlugin};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Stand-in compiler: prefixes the source with its format and counts calls.
    #[derive(Debug, Default)]
    struct Tagging {
        calls: AtomicUsize,
        empty: bool,
    }

    impl ModuleCompiler for Tagging {
        fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut diagnostics = Diagnostics::default();
            diagnostics.push(ExtractedDiagnostic::new(
                DiagnosticKind::Transform,
                DiagnosticSeverity::Warning,
                "unused variable",
            ));
            Ok(CompileOutput {
                code: (!self.empty).then(|| format!("/*{}*/{}", request.format, request.code)),
                source_map: None,
                diagnostics,
            })
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/handler.ts"), "export const h = 1;").unwrap();
        dir
    }

    fn target(compiler: Arc<Tagging>) -> BuildTarget {
        let chain = PluginChain::new().with(StandalonePlugin::new(
            Arc::new(BundlingStrategy::default()),
            compiler,
        ));
        BuildTarget::new("handler", "lib/handler.ts").with_plugins(chain)
    }

    #[test]
    fn outputs_sharing_a_format_share_one_transform() {
        let dir = project();
        let compiler = Arc::new(Tagging::default());
        let target = target(compiler.clone())
            .with_output(OutputDescriptor::new("dist/handler.zip"))
            .with_output(OutputDescriptor::new("dist/handler.js"))
            .with_output(OutputDescriptor::new("dist/handler.cjs").format(OutputFormat::CommonJs));

        let report = Orchestrator::new(dir.path(), BuildSettings::default())
            .with_target(target)
            .run();

        assert!(report.is_success());
        assert_eq!(report.written().count(), 3);
        assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("dist/handler.cjs")).unwrap(),
            "/*commonjs*/export const h = 1;"
        );
    }

    #[test]
    fn missing_bundle_fails_output_but_not_other_targets() {
        let dir = project();
        let empty = Arc::new(Tagging {
            empty: true,
            ..Default::default()
        });
        let report = Orchestrator::new(dir.path(), BuildSettings::default())
            .with_target(target(empty).with_output(OutputDescriptor::new("dist/a.zip")))
            .with_target(
                target(Arc::new(Tagging::default()))
                    .with_output(OutputDescriptor::new("dist/b.js")),
            )
            .run();

        assert!(!report.is_success());
        assert_eq!(report.targets[0].outputs.len(), 1);
        assert!(!report.targets[0].outputs[0].is_written());
        assert!(report.targets[0].error.is_none());
        assert!(!dir.path().join("dist/a.zip").exists());
        assert!(dir.path().join("dist/b.js").exists());
    }

    #[test]
    fn target_without_transform_is_rejected() {
        let dir = project();
        let report = Orchestrator::new(dir.path(), BuildSettings::default())
            .with_target(
                BuildTarget::new("raw", "lib/handler.ts")
                    .with_output(OutputDescriptor::new("dist/raw.js")),
            )
            .run();

        assert!(!report.is_success());
        let error = report.targets[0].error.as_deref().unwrap();
        assert!(error.contains("no plugin that transforms"), "{error}");
        assert!(!dir.path().join("dist/raw.js").exists());
    }

    #[test]
    fn unreadable_entry_aborts_only_that_target() {
        let dir = project();
        let report = Orchestrator::new(dir.path(), BuildSettings::default())
            .with_target(
                BuildTarget::new("ghost", "lib/missing.ts")
                    .with_plugins(target(Arc::new(Tagging::default())).plugins)
                    .with_output(OutputDescriptor::new("dist/ghost.js")),
            )
            .with_target(
                target(Arc::new(Tagging::default()))
                    .with_output(OutputDescriptor::new("dist/ok.js")),
            )
            .run();

        assert!(report.targets[0].error.is_some());
        assert!(report.targets[0].outputs.is_empty());
        assert!(report.targets[1].is_success());
    }

    #[test]
    fn escaping_output_path_is_a_filesystem_fault() {
        let dir = project();
        let report = Orchestrator::new(dir.path(), BuildSettings::default())
            .with_target(
                target(Arc::new(Tagging::default()))
                    .with_output(OutputDescriptor::new("../outside.js"))
                    .with_output(OutputDescriptor::new("dist/never.js")),
            )
            .run();

        let target = &report.targets[0];
        assert_eq!(target.outputs.len(), 1);
        assert!(target.error.is_some());
        assert!(!dir.path().join("dist/never.js").exists());
    }

    #[test]
    fn parallel_run_keeps_declaration_order() {
        let dir = project();
        let settings = BuildSettings {
            parallel: true,
            ..Default::default()
        };
        let mut orchestrator = Orchestrator::new(dir.path(), settings);
        for i in 0..6 {
            orchestrator.add_target(
                target(Arc::new(Tagging::default()))
                    .with_output(OutputDescriptor::new(format!("dist/{i}.js"))),
            );
        }

        let report = orchestrator.run();
        let paths: Vec<_> = report.written().map(|o| o.path.clone()).collect();
        let expected: Vec<_> = (0..6)
            .map(|i| dir.path().join(format!("dist/{i}.js")))
            .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn settings_cwd_moves_the_root() {
        let dir = TempDir::new().unwrap();
        let settings = BuildSettings {
            cwd: Some(PathBuf::from("packages/app")),
            ..Default::default()
        };
        let orchestrator = Orchestrator::new(dir.path(), settings);
        assert_eq!(orchestrator.root(), dir.path().join("packages/app"));
    }
}
