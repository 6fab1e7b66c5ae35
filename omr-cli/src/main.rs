//! OMR CLI - Command line tool for DSM2 BDO OMR scenario post-processing.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "omr-cli",
    version,
    about = "DSM2 BDO OMR scenario post-processing toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: omr_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    omr_cmd::run(cli.command)
}
