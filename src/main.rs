//! Scenario Assert CLI
//!
//! Runs YAML scenario files against a shell command and checks each answer
//! with semantic assertions.

use clap::Parser;
use scenario_assert::{cli, commands::Commands, common::logging};

#[derive(Parser)]
#[command(name = "scenario-assert", about = "Semantic scenario assertions for LLM-backed functions")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
