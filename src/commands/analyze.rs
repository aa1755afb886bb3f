//! Analyze command handler: trend tallies, JSON summary and charts.

use anyhow::{Context, Result};
use proceedings_core::analysis::chart::render_trend_charts;
use proceedings_core::analysis::{build_trend_report, format_trend_table, write_trend_report};
use proceedings_core::config::PipelineConfig;

pub fn run_analyze_command(config: &PipelineConfig) -> Result<()> {
    let store = config.store();
    let report = build_trend_report(
        &store,
        &config.generation_keywords,
        &config.analysis_keywords,
        config.analysis_years.clone(),
    )
    .with_context(|| format!("Failed to read proceedings in '{}'", store.dir().display()))?;

    print!("{}", format_trend_table(&report));

    let summary = write_trend_report(&report, &config.output_dir).with_context(|| {
        format!(
            "Failed to write trend summary to '{}'",
            config.output_dir.display()
        )
    })?;
    println!("Wrote {}", summary.display());

    let charts = render_trend_charts(&report, &config.output_dir)
        .with_context(|| format!("Failed to draw charts in '{}'", config.output_dir.display()))?;
    for chart in charts {
        println!("Wrote {}", chart.display());
    }
    Ok(())
}
