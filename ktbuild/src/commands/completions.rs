use std::io;

use clap::{Args, CommandFactory};
use eyre::Result;
use ktbuild_core::ExitCode;

use super::Cli;

#[derive(Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    shell: clap_complete::Shell,
}

impl CompletionsCommand {
    pub fn run(&self) -> Result<ExitCode> {
        let mut cmd = Cli::command();
        clap_complete::generate(self.shell, &mut cmd, "ktbuild", &mut io::stdout());
        Ok(ExitCode::OK)
    }
}
