//! SVG line charts of trend tallies.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::{TrendReport, TrendSeries};

pub const GENERATION_PERCENTAGE_CHART: &str = "generation_percentage.svg";
pub const ANALYSIS_PERCENTAGE_CHART: &str = "analysis_percentage.svg";
pub const PERCENTAGE_OVERLAY_CHART: &str = "percentage_overlay.svg";
pub const ABSOLUTE_COUNTS_CHART: &str = "absolute_counts_overlay.svg";

const CHART_SIZE: (u32, u32) = (1000, 600);

/// Errors produced while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The output folder could not be created.
    #[error("cannot create chart folder {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plotting backend failed.
    #[error("failed to draw chart {path}: {message}")]
    Draw { path: PathBuf, message: String },

    /// A chart needs at least one year of data.
    #[error("no data to chart for {path}")]
    Empty { path: PathBuf },
}

fn draw_error(path: &Path, error: impl std::fmt::Display) -> ChartError {
    ChartError::Draw {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub points: Vec<(i32, f64)>,
}

impl ChartLine {
    /// Percentage per year of `series`.
    #[must_use]
    pub fn percentages(series: &TrendSeries) -> Self {
        Self {
            label: series.label.clone(),
            points: series.tallies.iter().map(|t| (t.year, t.percentage())).collect(),
        }
    }

    /// Relevant-record count per year of `series`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn counts(series: &TrendSeries) -> Self {
        Self {
            label: series.label.clone(),
            points: series.tallies.iter().map(|t| (t.year, t.relevant as f64)).collect(),
        }
    }
}

/// Renders the four trend charts of `report` into `output_dir`.
///
/// # Errors
///
/// Returns [`ChartError`] when the folder cannot be created or a chart fails to draw.
pub fn render_trend_charts(report: &TrendReport, output_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(output_dir).map_err(|source| ChartError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let generation_pct = ChartLine::percentages(&report.generation);
    let analysis_pct = ChartLine::percentages(&report.analysis);
    let charts = [
        (
            GENERATION_PERCENTAGE_CHART,
            "Percentage of Papers Related to Generation Over Years",
            "Percentage of Relevant Papers",
            vec![generation_pct.clone()],
        ),
        (
            ANALYSIS_PERCENTAGE_CHART,
            "Percentage of Papers Related to Analysis Over Years",
            "Percentage of Relevant Papers",
            vec![analysis_pct.clone()],
        ),
        (
            PERCENTAGE_OVERLAY_CHART,
            "Percentage of Papers Related to Topics Over Years",
            "Percentage of Relevant Papers",
            vec![generation_pct, analysis_pct],
        ),
        (
            ABSOLUTE_COUNTS_CHART,
            "Number of Papers Related to Topics Over Years",
            "Number of Relevant Papers",
            vec![
                ChartLine::counts(&report.generation),
                ChartLine::counts(&report.analysis),
            ],
        ),
    ];

    let mut written = Vec::with_capacity(charts.len());
    for (file_name, title, y_label, lines) in charts {
        let path = output_dir.join(file_name);
        render_line_chart(&path, title, y_label, &lines)?;
        written.push(path);
    }
    Ok(written)
}

/// Draws `lines` as a year-indexed line chart with point markers.
///
/// A legend is drawn when there is more than one line.
///
/// # Errors
///
/// Returns [`ChartError`] when there are no points or the backend fails.
pub fn render_line_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    lines: &[ChartLine],
) -> Result<(), ChartError> {
    let years = lines.iter().flat_map(|line| line.points.iter().map(|&(year, _)| year));
    let (Some(first), Some(last)) = (years.clone().min(), years.max()) else {
        return Err(ChartError::Empty {
            path: path.to_path_buf(),
        });
    };
    let (x_start, x_end) = if first == last {
        (first - 1, last + 1)
    } else {
        (first, last)
    };
    let y_peak = lines
        .iter()
        .flat_map(|line| line.points.iter().map(|&(_, value)| value))
        .fold(0.0_f64, f64::max);
    let y_end = if y_peak > 0.0 { y_peak * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_start..x_end, 0.0..y_end)
        .map_err(|e| draw_error(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_label)
        .x_labels(usize::try_from(x_end - x_start + 1).unwrap_or(1))
        .x_label_formatter(&|year| year.to_string())
        .draw()
        .map_err(|e| draw_error(path, e))?;

    for (index, line) in lines.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))
            .map_err(|e| draw_error(path, e))?
            .label(line.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(
                line.points
                    .iter()
                    .map(|&point| Circle::new(point, 4, color.filled())),
            )
            .map_err(|e| draw_error(path, e))?;
    }

    if lines.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| draw_error(path, e))?;
    }

    root.present().map_err(|e| draw_error(path, e))?;
    debug!(path = %path.display(), lines = lines.len(), "Chart written");
    Ok(())
}
