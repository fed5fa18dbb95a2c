//! CLI command handling
//!
//! Dispatches CLI commands and formats output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::logging::stdout_sink;
use crate::common::{paths, Result};
use crate::scenario::{load_scenarios, CommandInvokable, FailureKind, ScenarioRunner};
use crate::semantic::{LexicalComparator, ModelComparator, SemanticComparator};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            files,
            command,
            expect_failure,
            offline,
            config,
            quiet,
        } => {
            let config = load_config(config.as_deref())?;
            run(&files, &command, expect_failure, offline, quiet, &config).await
        }

        Commands::Config { config } => {
            let path = config.clone().or_else(paths::config_path);
            let config = load_config(config.as_deref())?;
            show_config(path, &config);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run(
    files: &[PathBuf],
    command: &str,
    expect_failure: Option<FailureKind>,
    offline: bool,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let comparator: Arc<dyn SemanticComparator> = if offline {
        Arc::new(LexicalComparator::new(config.comparator.similarity_threshold))
    } else {
        Arc::new(ModelComparator::from_config(&config.comparator)?)
    };

    let runner = ScenarioRunner::builder()
        .shared_comparator(comparator)
        .shared_log_sink((!quiet).then(stdout_sink))
        .runner_config(&config.runner)
        .build()?;

    let invokable = CommandInvokable::new(command);
    let mut passed = 0;

    for file in files {
        let scenarios = load_scenarios(file)?;
        tracing::info!(file = %file.display(), scenarios = scenarios.len(), "Loaded scenario file");

        println!(
            "\n{} {}\n",
            "Scenario file:".blue().bold(),
            file.display().to_string().white().bold()
        );

        let result = match expect_failure {
            Some(kind) => {
                runner
                    .run_all_expecting_failure(&invokable, &scenarios, kind)
                    .await
            }
            None => runner.run_all_expecting_success(&invokable, &scenarios).await,
        };

        if let Err(e) = result {
            println!("  {} {}: {}", "✗".red(), file.display(), e);
            return Err(e);
        }

        passed += scenarios.len();
        println!(
            "  {} {} scenario(s) in {}",
            "✓".green(),
            scenarios.len(),
            file.display().to_string().dimmed()
        );
    }

    println!(
        "\n{} {}\n",
        "✓".green().bold(),
        format!("{passed} scenario(s) passed").green().bold()
    );

    Ok(())
}

fn show_config(path: Option<PathBuf>, config: &Config) {
    let path = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no config directory)".to_string());

    println!("Config file:        {path}");
    println!(
        "Endpoint:           {}",
        config.comparator.endpoint.as_deref().unwrap_or("(unset)")
    );
    println!("API key:            {}", config.comparator.masked_api_key());
    println!("Model:              {}", config.comparator.model);
    println!("Timeout:            {}s", config.comparator.timeout_secs);
    println!(
        "Strict failure kind: {}",
        config.runner.strict_failure_kind
    );
}
