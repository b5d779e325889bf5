use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use ktbuild_compile::KotlinMainCompile;
use ktbuild_core::ExitCode;
use ktbuild_request::Request;

use super::{UnwrapOrExit, toolchain};
use crate::reports::{CheckReport, Report, TerminalOutput};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the compile request (defaults to ./request.toml)
    #[arg(short, long, default_value = "request.toml")]
    pub request: PathBuf,

    /// Print the compiler arguments of each pass
    #[arg(long)]
    pub show_args: bool,

    /// Print the compiler arguments as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<ExitCode> {
        let request = Request::from_file(&self.request).unwrap_or_exit();
        let ctx = request
            .to_context()
            .wrap_err("failed to build the request context")?;

        let plan = if self.show_args || self.json {
            let action = KotlinMainCompile::new(&toolchain(&request.toolchain));
            Some(action.plan(&ctx).unwrap_or_exit())
        } else {
            None
        };

        if self.json {
            let json = serde_json::to_string_pretty(&plan).wrap_err("failed to serialize plan")?;
            println!("{json}");
            return Ok(ExitCode::OK);
        }

        let report = CheckReport::new(&self.request, &request, plan);
        report.render(&mut TerminalOutput::new());
        Ok(ExitCode::OK)
    }
}
