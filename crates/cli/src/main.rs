use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::{Command, GlobalArgs};
use gmsfs_runtime::logging;

#[derive(Debug, Parser)]
#[command(name = "gmsfs", version, about = "Plain filesystem operations")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    commands::run(&cli.global, cli.command)
}
