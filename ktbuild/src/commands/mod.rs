mod check;
mod compile;
mod completions;

use std::sync::Arc;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use compile::CompileCommand;
use completions::CompletionsCommand;
use eyre::Result;
use ktbuild_compile::{
    Toolchain, compiler::ProcessCompiler, diagnostics::ConsoleSink, plugin_args::PluginIdentity,
};
use ktbuild_core::ExitCode;
use ktbuild_request::ToolchainConfig;

use crate::logging::LogArgs;

/// Extension trait for exiting on request errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for ktbuild_request::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

impl<T> UnwrapOrExit<T> for ktbuild_compile::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(e));
                std::process::exit(ExitCode::INTERNAL_ERROR.code());
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "ktbuild")]
#[command(version)]
#[command(about = "Compile Kotlin/JVM targets with optional annotation processing")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub logging: LogArgs,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<ExitCode> {
        match &self.command {
            Commands::Compile(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the target described by a request file
    Compile(CompileCommand),

    /// Validate a request file without running the compiler
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Build the toolchain a request asks for.
pub(crate) fn toolchain(config: &ToolchainConfig) -> Toolchain {
    let toolchain = Toolchain::new(
        Arc::new(ProcessCompiler::new(config.compiler.clone())),
        Arc::new(ConsoleSink::stdout()),
    );
    match (&config.kapt_jar, &config.kapt_plugin_id) {
        (Some(jar), Some(id)) => toolchain.with_kapt(PluginIdentity::new(jar, id)),
        (Some(jar), None) => toolchain.with_kapt(PluginIdentity::kapt(jar)),
        (None, _) => toolchain,
    }
}
