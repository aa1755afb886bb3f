//! Enrich and clean command handlers.

use anyhow::{Context, Result};
use proceedings_core::config::PipelineConfig;
use proceedings_core::enrich::{clean_folder, enrich_folder};

pub async fn run_enrich_command(config: &PipelineConfig, show_progress: bool) -> Result<()> {
    let archive = config
        .archive_client()
        .context("Failed to create archive client")?;
    let fetcher = config
        .pdf_fetcher()
        .context("Failed to create PDF client")?;
    let store = config.store();

    let report = enrich_folder(&store, &archive, &fetcher, show_progress)
        .await
        .with_context(|| format!("Failed to enrich proceedings in '{}'", store.dir().display()))?;

    println!(
        "Extracted {} of {} missing abstracts across {} files ({} failed, {} links resolved).",
        report.extracted, report.attempted, report.files, report.failed, report.urls_resolved
    );
    if report.files_skipped > 0 {
        println!("Skipped {} unreadable files.", report.files_skipped);
    }
    Ok(())
}

pub fn run_clean_command(config: &PipelineConfig) -> Result<()> {
    let store = config.store();
    let report = clean_folder(&store)
        .with_context(|| format!("Failed to clean proceedings in '{}'", store.dir().display()))?;
    println!(
        "Cleaned {} abstracts across {} files.",
        report.abstracts_changed, report.files
    );
    if report.files_skipped > 0 {
        println!("Skipped {} unreadable files.", report.files_skipped);
    }
    Ok(())
}
