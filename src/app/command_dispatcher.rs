//! CLI command routing: runs the pipeline named by the subcommand.

use std::io::IsTerminal;

use anyhow::Result;
use proceedings_core::config::PipelineConfig;

use crate::app::{config_runtime, terminal};
use crate::app_config::LoadedConfig;
use crate::cli::{Cli, Command, ConfigCommand};
use crate::commands;

pub(crate) async fn dispatch(
    cli: &Cli,
    loaded_config: &LoadedConfig,
    config: &PipelineConfig,
) -> Result<()> {
    match &cli.command {
        Command::Harvest(_) => commands::run_harvest_command(config).await,
        Command::Enrich => {
            let show_progress = terminal::should_show_progress(
                std::io::stderr().is_terminal(),
                cli.quiet,
                terminal::is_dumb_terminal(),
            );
            commands::run_enrich_command(config, show_progress).await
        }
        Command::Clean => commands::run_clean_command(config),
        Command::Analyze(_) => commands::run_analyze_command(config),
        Command::TopDownloads(_) => commands::run_top_downloads_command(config).await,
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                let verbosity = config_runtime::verbosity_label(
                    cli,
                    loaded_config.config.as_ref().and_then(|c| c.verbosity),
                );
                commands::run_config_show_command(loaded_config, config, verbosity);
                Ok(())
            }
        },
    }
}
