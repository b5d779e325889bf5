use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use ktbuild_compile::{ActionError, ActionRunner};
use ktbuild_core::ExitCode;
use ktbuild_request::Request;

use super::{UnwrapOrExit, toolchain};

#[derive(Args)]
pub struct CompileCommand {
    /// Path to the compile request (defaults to ./request.toml)
    #[arg(short, long, default_value = "request.toml")]
    pub request: PathBuf,
}

impl CompileCommand {
    /// Run the compile command
    pub fn run(&self) -> Result<ExitCode> {
        let request = Request::from_file(&self.request).unwrap_or_exit();
        let mut ctx = request
            .to_context()
            .wrap_err("failed to build the request context")?;

        let runner = ActionRunner::kotlin_jvm(&toolchain(&request.toolchain));
        tracing::info!(
            request = %self.request.display(),
            label = request.label.as_deref().unwrap_or("<unlabeled>"),
            processors = request.processor_count(),
            "running compile actions"
        );

        match runner.run(&mut ctx) {
            Ok(code) => Ok(code),
            Err(err) => {
                let code = failure_exit_code(&err);
                eprintln!("{:?}", miette::Report::new(err));
                Ok(code)
            }
        }
    }
}

/// Process exit code for an action that failed with an error.
///
/// A terminal compiler exit keeps its own code; every other failure is an
/// internal error.
fn failure_exit_code(err: &ActionError) -> ExitCode {
    match err {
        ActionError::TerminalExit { code, .. } => *code,
        _ => ExitCode::INTERNAL_ERROR,
    }
}
