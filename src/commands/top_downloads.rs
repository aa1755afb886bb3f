//! Top-downloads command handler: most-downloaded relevant papers per year.

use anyhow::{Context, Result};
use proceedings_core::analysis::ranking::{format_rankings, rank_top_downloads, write_rankings};
use proceedings_core::config::PipelineConfig;

pub async fn run_top_downloads_command(config: &PipelineConfig) -> Result<()> {
    let archive = config
        .archive_client()
        .context("Failed to create archive client")?;
    let store = config.store();

    let rankings = rank_top_downloads(
        &store,
        &archive,
        &config.generation_keywords,
        &config.ranking_options(),
    )
    .await;

    print!("{}", format_rankings(&rankings));

    let path = write_rankings(&rankings, &config.output_dir).with_context(|| {
        format!(
            "Failed to write rankings to '{}'",
            config.output_dir.display()
        )
    })?;
    println!("Wrote {}", path.display());
    Ok(())
}
