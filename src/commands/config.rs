//! Config command handlers: show effective configuration.

use proceedings_core::config::PipelineConfig;

use crate::app_config::LoadedConfig;

fn display_range(range: &std::ops::RangeInclusive<i32>) -> String {
    format!("{}..={}", range.start(), range.end())
}

pub fn run_config_show_command(
    loaded_config: &LoadedConfig,
    config: &PipelineConfig,
    verbosity: &str,
) {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("proceedings_dir = {}", config.proceedings_dir.display());
    println!("output_dir = {}", config.output_dir.display());
    println!("venue = {}", config.venue);
    println!("catalog_base_url = {}", config.catalog_base_url);
    println!("archive_base_url = {}", config.archive_base_url);
    println!("request_delay_ms = {}", config.request_delay.as_millis());
    println!("connect_timeout_secs = {}", config.api_timeouts.connect.as_secs());
    println!("read_timeout_secs = {}", config.api_timeouts.read.as_secs());
    println!("pdf_read_timeout_secs = {}", config.pdf_timeouts.read.as_secs());
    println!(
        "scratch_dir = {}",
        config
            .scratch_dir
            .as_ref()
            .map_or_else(|| "<system temp>".to_string(), |dir| dir.display().to_string())
    );
    println!("harvest_years = {}", display_range(&config.harvest_years));
    println!("analyze_years = {}", display_range(&config.analysis_years));
    println!("top_years = {}", display_range(&config.ranking_years));
    println!("top_limit = {}", config.top_limit);
    println!(
        "generation_keywords = {}",
        config.generation_keywords.keywords().join(", ")
    );
    println!(
        "analysis_keywords = {}",
        config.analysis_keywords.keywords().join(", ")
    );
    println!("verbosity = {verbosity}");
}
