//! Kotlin main compile action.

use std::path::Path;

use ktbuild_core::{CompileDirectories, Context, ExitCode, Flag, Key, keys};
use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{
    ActionError, BuildAction, CompilePhase, CompletedPhase, DeferredResult, PhaseInvoker,
    PhaseOutcome, Result, Toolchain,
    plugin_args::{PluginArgBundle, PluginIdentity},
};

/// Flags that map directly onto `kotlinc` arguments, in argument order.
const COMPILE_MAPPED_FLAGS: [Flag; 4] = [
    Flag::Classpath,
    Flag::KotlinApiVersion,
    Flag::KotlinLanguageVersion,
    Flag::KotlinJvmTarget,
];

/// Whether a request needs an annotation processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationProcessing {
    /// The request carries no processor descriptor.
    NotConfigured,
    /// A descriptor is present but lists no processors.
    NothingToRun,
    /// Processors must run; the bundle configures the kapt plugin.
    Run(PluginArgBundle),
}

/// The compiler arguments a request would be compiled with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilePlan {
    /// Arguments of the annotation processing pass, if it runs.
    pub annotation_processing: Option<Vec<String>>,
    /// Arguments of the main pass, without generated sources.
    pub main: Vec<String>,
}

/// Compiles the Kotlin sources of a request.
///
/// When annotation processors are configured, a kapt pass runs first and
/// its diagnostics are reported immediately; a failing kapt pass ends the
/// action with its exit code. The main pass then compiles the original and
/// generated sources. Its outcome is not reported here: it is stored under
/// [`KotlinMainCompile::RESULT`] for a later stage, and the action itself
/// returns success. Terminal exit codes of either pass are errors.
///
/// Javac is not driven through the Kotlin compiler; generated Java sources
/// are only passed along so the main pass can resolve against them.
#[derive(Debug)]
pub struct KotlinMainCompile {
    invoker: PhaseInvoker,
    kapt: Option<PluginIdentity>,
}

impl KotlinMainCompile {
    /// Slot holding the deferred result of the main compile pass.
    pub const RESULT: Key<DeferredResult> = Key::new("kotlin_compile_result");

    pub fn new(toolchain: &Toolchain) -> Self {
        Self {
            invoker: toolchain.phase_invoker(),
            kapt: toolchain.kapt().cloned(),
        }
    }

    /// Arguments shared by both passes: mapped flags and the class output
    /// directory.
    pub fn common_args(&self, ctx: &Context) -> Result<Vec<String>> {
        let directories = ctx.must_get(&keys::COMPILE_DIRECTORIES)?;

        let mut args = Vec::new();
        for (flag, value) in ctx.copy_of_flags(&COMPILE_MAPPED_FLAGS) {
            if let Some(kotlin_flag) = flag.kotlin_flag() {
                args.push(kotlin_flag.to_string());
                args.push(value);
            }
        }
        args.push("-d".to_string());
        args.push(directories.classes.clone());
        Ok(args)
    }

    /// Decide whether annotation processing has to run.
    pub fn annotation_processing(&self, ctx: &Context) -> Result<AnnotationProcessing> {
        let Some(descriptor) = ctx.get(&keys::PLUGIN_DESCRIPTORS) else {
            return Ok(AnnotationProcessing::NotConfigured);
        };
        if descriptor.is_empty() {
            return Ok(AnnotationProcessing::NothingToRun);
        }

        let kapt = self.kapt.clone().ok_or(ActionError::KaptUnavailable)?;
        let directories = ctx.must_get(&keys::COMPILE_DIRECTORIES)?;
        Ok(AnnotationProcessing::Run(PluginArgBundle::kapt(
            kapt,
            directories,
            descriptor,
        )))
    }

    /// Compute the arguments of both passes without running the compiler.
    pub fn plan(&self, ctx: &Context) -> Result<CompilePlan> {
        let common = self.common_args(ctx)?;
        let sources = ctx.must_get(&keys::ALL_SOURCES)?;

        let annotation_processing = match self.annotation_processing(ctx)? {
            AnnotationProcessing::Run(bundle) => {
                let plugin_args = bundle.to_args();
                Some([&common[..], &plugin_args[..], &sources[..]].concat())
            }
            AnnotationProcessing::NotConfigured | AnnotationProcessing::NothingToRun => None,
        };

        Ok(CompilePlan {
            annotation_processing,
            main: [&common[..], &sources[..]].concat(),
        })
    }

    fn run_phase(&self, phase: CompilePhase, args: &[String]) -> Result<CompletedPhase> {
        match self.invoker.invoke(phase, args)? {
            PhaseOutcome::Completed(completed) => Ok(completed),
            PhaseOutcome::Terminal(code) => Err(ActionError::TerminalExit { phase, code }),
        }
    }
}

impl BuildAction for KotlinMainCompile {
    fn name(&self) -> &'static str {
        "compile kotlin classes"
    }

    fn description(&self) -> &'static str {
        "Run annotation processing and the main Kotlin compile pass"
    }

    fn invoke(&self, ctx: &mut Context) -> Result<ExitCode> {
        let common = self.common_args(ctx)?;
        let sources = ctx.must_get(&keys::ALL_SOURCES)?.clone();

        let mut generated = Vec::new();
        match self.annotation_processing(ctx)? {
            AnnotationProcessing::Run(bundle) => {
                let plugin_args = bundle.to_args();
                let args = [&common[..], &plugin_args[..], &sources[..]].concat();
                let exit_code = self
                    .run_phase(CompilePhase::AnnotationProcessing, &args)?
                    .flush();
                if !exit_code.is_ok() {
                    return Ok(exit_code);
                }
                generated = generated_java_sources(ctx.must_get(&keys::COMPILE_DIRECTORIES)?)?;
            }
            AnnotationProcessing::NothingToRun => {
                debug!("annotation processing configured without processors");
            }
            AnnotationProcessing::NotConfigured => {}
        }

        let args = [common, sources, generated].concat();
        // Give the Java compile stage a chance to run before reporting.
        let result = self.run_phase(CompilePhase::Main, &args)?.defer();
        info!(exit_code = %result.exit_code(), "deferring kotlin compile result");
        ctx.put(&Self::RESULT, result)?;

        Ok(ExitCode::OK)
    }
}

/// Java sources written by annotation processors, sorted by path.
fn generated_java_sources(directories: &CompileDirectories) -> Result<Vec<String>> {
    let root = Path::new(&directories.annotation_processing_sources);
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ActionError::GeneratedSources {
            path: root.to_path_buf(),
            source,
        })?;
        let is_java = entry.path().extension().is_some_and(|ext| ext == "java");
        if entry.file_type().is_file() && is_java {
            sources.push(entry.path().display().to_string());
        }
    }
    debug!(count = sources.len(), "found generated java sources");
    Ok(sources)
}
