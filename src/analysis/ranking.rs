//! Most-downloaded relevant papers per year.
//!
//! Download counts and citations come from the archive, one request at a
//! time. A failed lookup leaves the value absent and never aborts the run.

use std::cmp::Reverse;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::KeywordSet;
use crate::archive::ArchiveClient;
use crate::record::PaperRecord;
use crate::store::{ProceedingsStore, StoreError, write_pretty_json};

pub const DEFAULT_TOP_FROM_YEAR: i32 = 2019;
pub const DEFAULT_TOP_TO_YEAR: i32 = 2022;
/// Papers kept per year.
pub const DEFAULT_TOP_LIMIT: usize = 5;
/// File name of the JSON ranking output.
pub const TOP_DOWNLOADS_FILE: &str = "top_downloads.json";

/// A relevant paper with its archival statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPaper {
    pub title: String,
    pub url: Option<String>,
    pub zenodo_id: Option<String>,
    /// Absent when the paper has no identifier or the lookup failed.
    pub downloads: Option<u64>,
    /// BibTeX entry, fetched only for papers that make the cut.
    pub citation: Option<String>,
}

impl RankedPaper {
    fn from_record(record: &PaperRecord) -> Self {
        Self {
            title: record.title.clone(),
            url: record.url.clone(),
            zenodo_id: record.zenodo_id.clone(),
            downloads: None,
            citation: None,
        }
    }
}

/// Ranking for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearRanking {
    pub year: i32,
    /// Relevant records in the year file.
    pub relevant: usize,
    /// Titles of relevant records with no archival identifier.
    pub without_identifier: Vec<String>,
    /// Top papers, most downloaded first.
    pub top: Vec<RankedPaper>,
}

/// Options for [`rank_top_downloads`].
#[derive(Debug, Clone)]
pub struct RankingOptions {
    pub years: RangeInclusive<i32>,
    pub limit: usize,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            years: DEFAULT_TOP_FROM_YEAR..=DEFAULT_TOP_TO_YEAR,
            limit: DEFAULT_TOP_LIMIT,
        }
    }
}

/// Sorts by download count, highest first. Absent counts rank as zero and
/// ties keep their file order.
pub fn sort_by_downloads(papers: &mut [RankedPaper]) {
    papers.sort_by_key(|paper| Reverse(paper.downloads.unwrap_or(0)));
}

/// Ranks the relevant papers of each year by archival download count.
///
/// Years whose file is missing or unreadable are logged and skipped.
#[instrument(skip_all, fields(from = options.years.start(), to = options.years.end(), limit = options.limit))]
pub async fn rank_top_downloads(
    store: &ProceedingsStore,
    archive: &ArchiveClient,
    keywords: &KeywordSet,
    options: &RankingOptions,
) -> Vec<YearRanking> {
    let mut rankings = Vec::new();

    for year in options.years.clone() {
        let records = match store.load(year) {
            Ok(records) => records,
            Err(error) => {
                warn!(year, error = %error, "Cannot read proceedings file; skipping year");
                continue;
            }
        };
        rankings.push(rank_year(year, &records, archive, keywords, options.limit).await);
    }

    rankings
}

async fn rank_year(
    year: i32,
    records: &[PaperRecord],
    archive: &ArchiveClient,
    keywords: &KeywordSet,
    limit: usize,
) -> YearRanking {
    let mut papers = Vec::new();
    let mut without_identifier = Vec::new();

    for record in records.iter().filter(|record| keywords.is_relevant(record)) {
        let mut paper = RankedPaper::from_record(record);
        match paper.zenodo_id.as_deref() {
            Some(id) => match archive.download_count(id).await {
                Ok(downloads) => paper.downloads = downloads,
                Err(error) => warn!(year, zenodo_id = id, error = %error, "Failed to fetch download statistics"),
            },
            None => {
                info!(year, title = %paper.title, "Relevant paper has no archival identifier");
                without_identifier.push(paper.title.clone());
            }
        }
        papers.push(paper);
    }

    let relevant = papers.len();
    sort_by_downloads(&mut papers);
    papers.truncate(limit);

    for paper in &mut papers {
        let Some(id) = paper.zenodo_id.as_deref() else {
            continue;
        };
        match archive.bibtex_citation(id).await {
            Ok(citation) => paper.citation = Some(citation),
            Err(error) => warn!(year, zenodo_id = id, error = %error, "Failed to fetch citation"),
        }
    }

    YearRanking {
        year,
        relevant,
        without_identifier,
        top: papers,
    }
}

/// Writes `rankings` as [`TOP_DOWNLOADS_FILE`] inside `output_dir`.
///
/// # Errors
///
/// Returns [`StoreError`] when the folder or file cannot be written.
pub fn write_rankings(rankings: &[YearRanking], output_dir: &Path) -> Result<PathBuf, StoreError> {
    std::fs::create_dir_all(output_dir).map_err(|e| StoreError::io(output_dir, e))?;
    let path = output_dir.join(TOP_DOWNLOADS_FILE);
    write_pretty_json(&path, rankings)?;
    Ok(path)
}

/// Human-readable report: per year, each top title with its link and citation.
#[must_use]
pub fn format_rankings(rankings: &[YearRanking]) -> String {
    let mut out = String::new();
    for ranking in rankings {
        out.push_str(&format!("Year: {}\n", ranking.year));
        for paper in &ranking.top {
            let downloads = paper
                .downloads
                .map_or_else(|| "n/a".to_string(), |count| count.to_string());
            out.push_str(&format!("{} ({downloads} downloads)\n", paper.title));
            if let Some(url) = &paper.url {
                out.push_str(&format!("{url}\n"));
            }
            if let Some(citation) = &paper.citation {
                out.push_str(citation);
                out.push('\n');
            }
        }
    }
    out
}
