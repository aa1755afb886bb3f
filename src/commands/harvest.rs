//! Harvest command handler: catalog + archive → one proceedings file per year.

use anyhow::{Context, Result};
use proceedings_core::config::PipelineConfig;
use proceedings_core::harvest::harvest;
use tracing::info;

pub async fn run_harvest_command(config: &PipelineConfig) -> Result<()> {
    let catalog = config
        .catalog_client()
        .context("Failed to create catalog client")?;
    let archive = config
        .archive_client()
        .context("Failed to create archive client")?;
    let store = config.store();
    let options = config.harvest_options();

    info!(
        from = options.years.start(),
        to = options.years.end(),
        dir = %store.dir().display(),
        "Harvesting proceedings"
    );
    let report = harvest(&catalog, &archive, &store, &options)
        .await
        .with_context(|| format!("Failed to write proceedings to '{}'", store.dir().display()))?;

    println!(
        "Harvested {} records for {} years ({} archival matches).",
        report.records,
        report.years_written.len(),
        report.archive_matches
    );
    if !report.years_failed.is_empty() {
        let failed: Vec<String> = report.years_failed.iter().map(ToString::to_string).collect();
        println!("Catalog unavailable for: {}", failed.join(", "));
    }
    Ok(())
}
