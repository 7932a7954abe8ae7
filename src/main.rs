//! Tourboost - Main Entry Point
//!
//! Trains the order-type model, runs feature search or scores with a saved
//! model, depending on the subcommand. Without one it performs a single run.

use clap::Parser;
use tourboost::cli::{cmd_info, cmd_predict, cmd_run, cmd_search, Cli, Commands};
use tourboost::config::PipelineConfig;
use tourboost::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = PipelineConfig::load_or_default(cli.config.as_deref())?;
    let _log_guard = logging::init(&config.logging)?;

    match cli.command {
        Some(Commands::Run) | None => {
            cmd_run(config)?;
        }
        Some(Commands::Search { ranked_features, resume }) => {
            cmd_search(config, ranked_features.as_deref(), resume.as_deref())?;
        }
        Some(Commands::Predict { model, output }) => {
            cmd_predict(config, &model, output.as_deref())?;
        }
        Some(Commands::Info) => {
            cmd_info(config)?;
        }
    }

    Ok(())
}
