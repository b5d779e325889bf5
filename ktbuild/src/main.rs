mod commands;
mod logging;
mod reports;

use clap::Parser;
use eyre::Result;

use crate::commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&cli.logging)?;

    let code = cli.run()?;
    std::process::exit(code.code())
}
