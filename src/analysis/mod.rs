//! Keyword trend analysis over a proceedings folder.
//!
//! - [`KeywordSet`] - topic keywords and the relevance predicate
//! - [`analyze_folder`] - per-year totals and relevant counts
//! - [`chart`] - SVG line charts of the tallies
//! - [`ranking`] - most-downloaded relevant papers per year

pub mod chart;
mod keywords;
pub mod ranking;

pub use keywords::{ANALYSIS_KEYWORDS, GENERATION_KEYWORDS, KeywordSet, load_keyword_set};

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::ser::SerializeStruct;
use tracing::{debug, info, instrument, warn};

use crate::record::PaperRecord;
use crate::store::{ProceedingsStore, StoreError, write_pretty_json};

/// First year of the default analysis range.
pub const DEFAULT_ANALYSIS_FROM_YEAR: i32 = 2000;
/// Last year of the default analysis range.
pub const DEFAULT_ANALYSIS_TO_YEAR: i32 = 2022;
/// File name of the JSON trend summary.
pub const TRENDS_FILE: &str = "trends.json";

/// Record counts for one year and one keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTally {
    pub year: i32,
    /// Records in the year file (0 when the file is missing).
    pub total: usize,
    /// Records matching the keyword set.
    pub relevant: usize,
}

impl YearTally {
    /// `relevant / total * 100`, or `0.0` for a year with no records.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.relevant as f64 / self.total as f64 * 100.0
    }
}

impl Serialize for YearTally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("YearTally", 4)?;
        state.serialize_field("year", &self.year)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("relevant", &self.relevant)?;
        state.serialize_field("percentage", &self.percentage())?;
        state.end()
    }
}

/// Tallies for every year of a range, in year order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    /// Topic name used in reports and chart legends.
    pub label: String,
    pub keywords: KeywordSet,
    pub tallies: Vec<YearTally>,
}

impl TrendSeries {
    /// Tally for `year`, if inside the analyzed range.
    #[must_use]
    pub fn tally(&self, year: i32) -> Option<&YearTally> {
        self.tallies.iter().find(|tally| tally.year == year)
    }
}

/// Both topic series over the same years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub from_year: i32,
    pub to_year: i32,
    pub generation: TrendSeries,
    pub analysis: TrendSeries,
}

/// Records of each year in a range, loaded once and shared between keyword sets.
#[derive(Debug, Default)]
pub struct YearRecords {
    years: BTreeMap<i32, Vec<PaperRecord>>,
}

impl YearRecords {
    /// Loads the year files of `store` that fall inside `years`.
    ///
    /// Years without a file are simply absent. Unreadable files are logged and
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the folder is missing or cannot be listed.
    pub fn load(store: &ProceedingsStore, years: &RangeInclusive<i32>) -> Result<Self, StoreError> {
        let mut loaded = BTreeMap::new();
        for file in store.list_year_files()? {
            if !years.contains(&file.year) {
                debug!(year = file.year, "Year outside analysis range; ignoring");
                continue;
            }
            match store.load_path(&file.path) {
                Ok(records) => {
                    loaded.insert(file.year, records);
                }
                Err(error) => warn!(year = file.year, error = %error, "Skipping unreadable proceedings file"),
            }
        }
        Ok(Self { years: loaded })
    }

    /// Records for `year`, empty when none were loaded.
    #[must_use]
    pub fn records(&self, year: i32) -> &[PaperRecord] {
        self.years.get(&year).map(Vec::as_slice).unwrap_or_default()
    }

    /// Counts totals and relevant records for every year in `years`.
    #[must_use]
    pub fn tally(&self, label: &str, keywords: &KeywordSet, years: RangeInclusive<i32>) -> TrendSeries {
        let tallies = years
            .map(|year| tally_year(year, self.records(year), keywords))
            .collect();
        TrendSeries {
            label: label.to_string(),
            keywords: keywords.clone(),
            tallies,
        }
    }
}

/// Counts the records of one year against `keywords`.
#[must_use]
pub fn tally_year(year: i32, records: &[PaperRecord], keywords: &KeywordSet) -> YearTally {
    YearTally {
        year,
        total: records.len(),
        relevant: records.iter().filter(|record| keywords.is_relevant(record)).count(),
    }
}

/// Tallies one keyword set over the year files in `store`.
///
/// Every year of `years` appears in the result, with zero counts when its
/// file is missing. Files outside the range are ignored.
///
/// # Errors
///
/// Returns [`StoreError`] when the folder is missing or cannot be listed.
pub fn analyze_folder(
    store: &ProceedingsStore,
    label: &str,
    keywords: &KeywordSet,
    years: RangeInclusive<i32>,
) -> Result<TrendSeries, StoreError> {
    let loaded = YearRecords::load(store, &years)?;
    Ok(loaded.tally(label, keywords, years))
}

/// Builds the generation and analysis series in a single pass over the folder.
///
/// # Errors
///
/// Returns [`StoreError`] when the folder is missing or cannot be listed.
#[instrument(skip_all, fields(from = years.start(), to = years.end()))]
pub fn build_trend_report(
    store: &ProceedingsStore,
    generation: &KeywordSet,
    analysis: &KeywordSet,
    years: RangeInclusive<i32>,
) -> Result<TrendReport, StoreError> {
    let loaded = YearRecords::load(store, &years)?;
    let report = TrendReport {
        from_year: *years.start(),
        to_year: *years.end(),
        generation: loaded.tally("Generation", generation, years.clone()),
        analysis: loaded.tally("Analysis", analysis, years),
    };
    info!(
        generation_relevant = report.generation.tallies.iter().map(|t| t.relevant).sum::<usize>(),
        analysis_relevant = report.analysis.tallies.iter().map(|t| t.relevant).sum::<usize>(),
        "Trend analysis complete"
    );
    Ok(report)
}

/// Writes `report` as [`TRENDS_FILE`] inside `output_dir`, creating the folder.
///
/// # Errors
///
/// Returns [`StoreError`] when the folder or file cannot be written.
pub fn write_trend_report(report: &TrendReport, output_dir: &Path) -> Result<PathBuf, StoreError> {
    std::fs::create_dir_all(output_dir).map_err(|e| StoreError::io(output_dir, e))?;
    let path = output_dir.join(TRENDS_FILE);
    write_pretty_json(&path, report)?;
    Ok(path)
}

/// Plain-text table of both series, one line per year.
#[must_use]
pub fn format_trend_table(report: &TrendReport) -> String {
    let mut out = format!(
        "{:<6} {:>6} {:>11} {:>8} {:>9} {:>8}\n",
        "year", "total", "generation", "gen %", "analysis", "ana %"
    );
    for (generation, analysis) in report.generation.tallies.iter().zip(&report.analysis.tallies) {
        out.push_str(&format!(
            "{:<6} {:>6} {:>11} {:>7.1}% {:>9} {:>7.1}%\n",
            generation.year,
            generation.total,
            generation.relevant,
            generation.percentage(),
            analysis.relevant,
            analysis.percentage(),
        ));
    }
    out
}
