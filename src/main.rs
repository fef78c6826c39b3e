//! Trip Planner CLI binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trip_planner::cli::{self, errors, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_directive().into()),
        )
        .init();

    if let Err(e) = cli::run(cli).await {
        eprintln!("Error: {}", errors::format_error_help(&e));
        std::process::exit(1);
    }
}
