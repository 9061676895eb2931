//! tr55-cli - Command line tool for TR-55 runoff computations.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tr55-cli",
    version,
    about = "NRCS TR-55 runoff modeling toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: tr55_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    tr55_cmd::run(cli.command).await
}
