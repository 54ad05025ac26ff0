// Progress monitor CLI binary

use clap::Parser;
use progress_monitor::commands::{self, Cli};
use progress_monitor::logging::init_logging;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    commands::run(cli).await
}
