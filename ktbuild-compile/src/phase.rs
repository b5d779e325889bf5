//! Single compiler phase invocation.

use std::{fmt, sync::Arc};

use ktbuild_core::ExitCode;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    DeferredResult, InvocationFault,
    compiler::Compiler,
    diagnostics::{DiagnosticsSink, OutputProcessor},
};

/// The compiler passes a Kotlin compile action can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilePhase {
    /// The kapt pass that runs annotation processors and generates sources.
    AnnotationProcessing,
    /// The main pass over the original and generated sources.
    Main,
}

impl CompilePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompilePhase::AnnotationProcessing => "annotation processing",
            CompilePhase::Main => "kotlin compile",
        }
    }
}

impl fmt::Display for CompilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a phase whose exit code did not abort the action.
///
/// The diagnostics are still pending: the caller either flushes them right
/// away or hands them on inside a [`DeferredResult`].
#[derive(Debug)]
pub struct CompletedPhase {
    pub exit_code: ExitCode,
    pub diagnostics: OutputProcessor,
}

impl CompletedPhase {
    /// Flush the diagnostics now and return the exit code.
    pub fn flush(self) -> ExitCode {
        self.diagnostics.process();
        self.exit_code
    }

    /// Postpone the diagnostics until the result is finalized.
    pub fn defer(self) -> DeferredResult {
        DeferredResult::new(self.exit_code, self.diagnostics)
    }
}

/// The result of invoking one compiler phase.
#[derive(Debug)]
pub enum PhaseOutcome {
    /// The compiler returned a non-terminal exit code (below 2).
    Completed(CompletedPhase),
    /// The compiler returned a terminal exit code. Diagnostics have
    /// already been flushed.
    Terminal(ExitCode),
}

/// Invokes the compiler for a single phase and classifies its exit code.
///
/// Every invocation flushes its diagnostics exactly once: here for faults
/// and terminal codes, through [`CompletedPhase`] otherwise.
pub struct PhaseInvoker {
    compiler: Arc<dyn Compiler>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl PhaseInvoker {
    pub fn new(compiler: Arc<dyn Compiler>, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { compiler, sink }
    }

    /// Run the compiler once with `args`.
    ///
    /// # Errors
    ///
    /// Returns the compiler's fault unchanged, after flushing whatever
    /// diagnostics were collected before it was raised.
    pub fn invoke(
        &self,
        phase: CompilePhase,
        args: &[String],
    ) -> Result<PhaseOutcome, InvocationFault> {
        let mut output = OutputProcessor::new(phase, Arc::clone(&self.sink));
        debug!(%phase, ?args, "invoking compiler");

        let exit_code = match self.compiler.compile(args, output.collector_mut()) {
            Ok(code) => ExitCode::new(code),
            Err(fault) => {
                output.process();
                return Err(fault);
            }
        };
        info!(
            %phase,
            %exit_code,
            errors = output.collector().has_errors(),
            "compiler phase finished"
        );

        // 1 is a standard compilation error, 2 an internal error and 3 a
        // script execution error.
        if exit_code.is_terminal() {
            output.process();
            return Ok(PhaseOutcome::Terminal(exit_code));
        }

        Ok(PhaseOutcome::Completed(CompletedPhase {
            exit_code,
            diagnostics: output,
        }))
    }
}

impl fmt::Debug for PhaseInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseInvoker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSink, ScriptedCompiler, Step};

    fn make_invoker(steps: Vec<Step>) -> (PhaseInvoker, Arc<ScriptedCompiler>, Arc<RecordingSink>) {
        let compiler = Arc::new(ScriptedCompiler::new(steps));
        let sink = Arc::new(RecordingSink::new());
        let invoker = PhaseInvoker::new(compiler.clone(), sink.clone());
        (invoker, compiler, sink)
    }

    #[test]
    fn test_non_terminal_codes_flush_once_without_error() {
        for code in [0, 1] {
            let (invoker, compiler, sink) = make_invoker(vec![Step::Exit(code)]);

            let outcome = invoker
                .invoke(CompilePhase::Main, &["a.kt".to_string()])
                .expect("no fault expected");

            let PhaseOutcome::Completed(completed) = outcome else {
                panic!("code {code} should not be terminal");
            };
            assert_eq!(sink.flush_count(CompilePhase::Main), 0);
            assert_eq!(completed.flush(), ExitCode::new(code));
            assert_eq!(sink.flush_count(CompilePhase::Main), 1);
            assert_eq!(compiler.invocation_count(), 1);
        }
    }

    #[test]
    fn test_terminal_codes_flush_before_returning() {
        for code in [2, 3] {
            let (invoker, _, sink) = make_invoker(vec![Step::Exit(code)]);

            let outcome = invoker.invoke(CompilePhase::Main, &[]).unwrap();

            assert!(matches!(outcome, PhaseOutcome::Terminal(c) if c.code() == code));
            assert_eq!(sink.flush_count(CompilePhase::Main), 1);
        }
    }

    #[test]
    fn test_fault_is_returned_unchanged_after_flush() {
        let (invoker, _, sink) = make_invoker(vec![Step::Fault]);

        let err = invoker
            .invoke(CompilePhase::AnnotationProcessing, &[])
            .unwrap_err();

        assert!(matches!(err, InvocationFault::Spawn { ref program, .. } if program == "scripted"));
        assert_eq!(sink.flush_count(CompilePhase::AnnotationProcessing), 1);
    }

    #[test]
    fn test_args_are_passed_through() {
        let (invoker, compiler, _) = make_invoker(vec![Step::Exit(0)]);
        let args = vec!["-d".to_string(), "out".to_string(), "a.kt".to_string()];

        let _ = invoker.invoke(CompilePhase::Main, &args).unwrap();

        assert_eq!(compiler.invocations(), vec![args]);
    }
}
