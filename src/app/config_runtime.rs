//! Merges built-in defaults, the config file, and CLI flags into a [`PipelineConfig`].
//!
//! Precedence: CLI flag > config file > built-in default.

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use proceedings_core::analysis::{KeywordSet, load_keyword_set};
use proceedings_core::config::PipelineConfig;
use proceedings_core::http_client::{
    DEFAULT_API_READ_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PDF_READ_TIMEOUT_SECS,
    HttpTimeouts,
};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{Cli, Command, YearRangeArgs};

/// Resolves the effective configuration for `cli`'s subcommand.
pub(crate) fn resolve_pipeline_config(
    cli: &Cli,
    file_config: Option<&FileConfig>,
) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();

    if let Some(file_config) = file_config {
        apply_file_config(&mut config, file_config)?;
    }

    if let Some(dir) = &cli.proceedings_dir {
        config.proceedings_dir.clone_from(dir);
    }

    match &cli.command {
        Command::Harvest(args) => {
            apply_year_args(&mut config.harvest_years, args.years);
        }
        Command::Analyze(args) => {
            apply_year_args(&mut config.analysis_years, args.years);
            if let Some(dir) = &args.output_dir {
                config.output_dir.clone_from(dir);
            }
        }
        Command::TopDownloads(args) => {
            apply_year_args(&mut config.ranking_years, args.years);
            if let Some(limit) = args.limit {
                config.top_limit = usize::from(limit);
            }
            if let Some(dir) = &args.output_dir {
                config.output_dir.clone_from(dir);
            }
        }
        Command::Enrich | Command::Clean | Command::Config { .. } => {}
    }

    validate_range("harvest", &config.harvest_years)?;
    validate_range("analysis", &config.analysis_years)?;
    validate_range("top-downloads", &config.ranking_years)?;
    Ok(config)
}

fn apply_file_config(config: &mut PipelineConfig, file_config: &FileConfig) -> Result<()> {
    if let Some(dir) = &file_config.proceedings_dir {
        config.proceedings_dir.clone_from(dir);
    }
    if let Some(dir) = &file_config.output_dir {
        config.output_dir.clone_from(dir);
    }
    if let Some(venue) = &file_config.venue {
        config.venue.clone_from(venue);
    }
    if let Some(url) = &file_config.catalog_base_url {
        config.catalog_base_url.clone_from(url);
    }
    if let Some(url) = &file_config.archive_base_url {
        config.archive_base_url.clone_from(url);
    }
    if let Some(delay) = file_config.request_delay_ms {
        config.request_delay = Duration::from_millis(delay);
    }
    if file_config.scratch_dir.is_some() {
        config.scratch_dir.clone_from(&file_config.scratch_dir);
    }
    if let Some(limit) = file_config.top_limit {
        config.top_limit = usize::try_from(limit).context("top_limit out of range")?;
    }

    let connect = file_config
        .connect_timeout_secs
        .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
    config.api_timeouts = HttpTimeouts::from_secs(
        connect,
        file_config
            .read_timeout_secs
            .unwrap_or(DEFAULT_API_READ_TIMEOUT_SECS),
    );
    config.pdf_timeouts = HttpTimeouts::from_secs(
        connect,
        file_config
            .pdf_read_timeout_secs
            .unwrap_or(DEFAULT_PDF_READ_TIMEOUT_SECS),
    );

    apply_year_bounds(
        &mut config.harvest_years,
        file_config.harvest_from_year,
        file_config.harvest_to_year,
    );
    apply_year_bounds(
        &mut config.analysis_years,
        file_config.analyze_from_year,
        file_config.analyze_to_year,
    );
    apply_year_bounds(
        &mut config.ranking_years,
        file_config.top_from_year,
        file_config.top_to_year,
    );

    if let Some(path) = &file_config.generation_topics_file {
        config.generation_keywords = load_topics(path)?;
    }
    if let Some(path) = &file_config.analysis_topics_file {
        config.analysis_keywords = load_topics(path)?;
    }
    Ok(())
}

fn load_topics(path: &Path) -> Result<KeywordSet> {
    let keywords = load_keyword_set(path)?;
    if keywords.is_empty() {
        tracing::warn!(path = %path.display(), "Keywords file is empty; no paper will match");
    }
    Ok(keywords)
}

fn apply_year_args(range: &mut RangeInclusive<i32>, args: YearRangeArgs) {
    apply_year_bounds(range, args.from, args.to);
}

fn apply_year_bounds(range: &mut RangeInclusive<i32>, from: Option<i32>, to: Option<i32>) {
    let start = from.unwrap_or(*range.start());
    let end = to.unwrap_or(*range.end());
    *range = start..=end;
}

fn validate_range(name: &str, range: &RangeInclusive<i32>) -> Result<()> {
    if range.start() > range.end() {
        bail!(
            "Invalid {name} year range: {} is after {}",
            range.start(),
            range.end()
        );
    }
    Ok(())
}

/// Default log level when `RUST_LOG` is unset.
///
/// Priority: quiet flag > verbose flag > config verbosity > info.
pub(crate) fn resolve_default_log_level(
    cli: &Cli,
    file_verbosity: Option<VerbositySetting>,
) -> &'static str {
    if cli.quiet {
        return "error";
    }
    match cli.verbose {
        0 => {}
        1 => return "debug",
        _ => return "trace",
    }
    match file_verbosity {
        Some(VerbositySetting::Quiet) => "error",
        Some(VerbositySetting::Verbose) => "debug",
        Some(VerbositySetting::Debug) => "trace",
        Some(VerbositySetting::Default) | None => "info",
    }
}

/// Label of the effective verbosity for `config show`.
pub(crate) fn verbosity_label(cli: &Cli, file_verbosity: Option<VerbositySetting>) -> &'static str {
    match resolve_default_log_level(cli, file_verbosity) {
        "error" => VerbositySetting::Quiet.as_str(),
        "debug" => VerbositySetting::Verbose.as_str(),
        "trace" => VerbositySetting::Debug.as_str(),
        _ => VerbositySetting::Default.as_str(),
    }
}
