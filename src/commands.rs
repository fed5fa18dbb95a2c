//! CLI command definitions
//!
//! Defines the clap commands for the scenario-assert CLI.

use clap::Subcommand;
use std::path::PathBuf;

use crate::scenario::FailureKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenario files against a shell command
    Run {
        /// YAML scenario files, run in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Shell command producing the answer. Scenario arguments are
        /// exported as SCENARIO_ARG_<NAME> environment variables
        #[arg(long, short)]
        command: String,

        /// Expect every scenario to fail an assertion of this kind
        #[arg(long, value_enum)]
        expect_failure: Option<FailureKind>,

        /// Use the offline word-overlap comparator instead of a model endpoint
        #[arg(long)]
        offline: bool,

        /// Configuration file to use instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,

        /// Do not print scenario transcripts
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the resolved configuration
    Config {
        /// Configuration file to use instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
