use std::path::PathBuf;

use ktbuild_core::{ContextError, ExitCode};
use miette::Diagnostic;
use thiserror::Error;

use crate::CompilePhase;

/// Result type for build actions.
pub type Result<T> = std::result::Result<T, ActionError>;

/// A fault raised by the compiler entry point itself, as opposed to an exit
/// code it returned.
#[derive(Debug, Error, Diagnostic)]
pub enum InvocationFault {
    #[error("failed to launch compiler '{program}'")]
    #[diagnostic(
        code(ktbuild::compiler::spawn),
        help("check toolchain.compiler in the request file")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read output of compiler '{program}'")]
    #[diagnostic(code(ktbuild::compiler::output))]
    Output {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler '{program}' was terminated by a signal")]
    #[diagnostic(code(ktbuild::compiler::terminated))]
    Terminated { program: String },
}

/// Errors that abort a build action.
#[derive(Debug, Error, Diagnostic)]
pub enum ActionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Context(#[from] ContextError),

    #[error("annotation processors are configured but no kapt plugin jar is available")]
    #[diagnostic(
        code(ktbuild::compile::kapt_unavailable),
        help("set toolchain.kapt_jar in the request file")
    )]
    KaptUnavailable,

    #[error("{phase} returned terminal error code: {code}")]
    #[diagnostic(code(ktbuild::compile::terminal_exit))]
    TerminalExit { phase: CompilePhase, code: ExitCode },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invocation(#[from] InvocationFault),

    #[error("failed to scan generated sources in '{}'", path.display())]
    #[diagnostic(code(ktbuild::compile::generated_sources))]
    GeneratedSources {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
