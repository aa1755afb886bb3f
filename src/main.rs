//! CLI entry point for the proceedings tool.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod app_config;
mod cli;
mod commands;

use app::{command_dispatcher, config_runtime, terminal};
use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded_config = app_config::load_config(cli.config.as_deref())?;
    let file_verbosity = loaded_config.config.as_ref().and_then(|c| c.verbosity);

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let default_level = config_runtime::resolve_default_log_level(&cli, file_verbosity);
    terminal::init_tracing(
        default_level,
        terminal::no_color_env_requested() || terminal::is_dumb_terminal(),
    );
    debug!(?cli, "CLI arguments parsed");

    let config = config_runtime::resolve_pipeline_config(&cli, loaded_config.config.as_ref())?;
    debug!(?config, "Effective configuration");

    command_dispatcher::dispatch(&cli, &loaded_config, &config).await
}
