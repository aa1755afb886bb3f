//! Harvester: catalog listing + archival lookup → one proceedings file per year.
//!
//! Years are processed one at a time with a fixed delay in between. A catalog
//! failure skips that year only; an archival lookup failure is treated as "no
//! match" for that paper.

use std::ops::RangeInclusive;
use std::time::Duration;

use strsim::normalized_levenshtein;
use tracing::{debug, info, instrument, warn};

use crate::archive::{ArchiveClient, ArchiveError, ArchiveMatch};
use crate::catalog::{CatalogClient, CatalogEntry};
use crate::record::{PaperRecord, doi_url};
use crate::store::{ProceedingsStore, StoreError};

/// Title similarity under which an archival match is reported as suspicious.
const TITLE_DRIFT_WARNING_THRESHOLD: f64 = 0.9;

/// Outcome of looking up one paper in the archive.
#[derive(Debug)]
pub enum ArchiveLookup {
    /// First search hit.
    Found(ArchiveMatch),
    /// The search returned no hits.
    NotFound,
    /// The search could not be completed.
    Failed(ArchiveError),
}

impl ArchiveLookup {
    fn from_result(result: Result<Option<ArchiveMatch>, ArchiveError>) -> Self {
        match result {
            Ok(Some(matched)) => Self::Found(matched),
            Ok(None) => Self::NotFound,
            Err(error) => Self::Failed(error),
        }
    }
}

/// Options controlling a harvest run.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Years to fetch, inclusive.
    pub years: RangeInclusive<i32>,
    /// Pause between consecutive years.
    pub delay: Duration,
}

/// Summary of a harvest run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    /// Years whose file was written.
    pub years_written: Vec<i32>,
    /// Years skipped because the catalog query failed.
    pub years_failed: Vec<i32>,
    /// Total records written across all years.
    pub records: usize,
    /// Records that received archival metadata.
    pub archive_matches: usize,
    /// Archival lookups that failed outright.
    pub archive_failures: usize,
}

/// Builds a paper record from a catalog entry and its archival lookup.
///
/// `requested_year` is used when the catalog entry carries no parseable year.
#[must_use]
pub fn build_record(entry: CatalogEntry, lookup: &ArchiveLookup, requested_year: i32) -> PaperRecord {
    let (doi, zenodo_id, r#abstract) = match lookup {
        ArchiveLookup::Found(matched) => (
            matched.doi.clone(),
            matched.id.clone(),
            matched.description.clone(),
        ),
        ArchiveLookup::NotFound | ArchiveLookup::Failed(_) => (None, None, None),
    };

    PaperRecord {
        title: entry.title,
        author: entry.authors,
        year: Some(entry.year.unwrap_or(requested_year)),
        url: doi.as_deref().map(doi_url),
        doi,
        ee: entry.ee,
        r#abstract,
        zenodo_id,
        dblp_key: entry.key,
    }
}

/// Runs the harvester over `options.years`, writing one file per year.
///
/// # Errors
///
/// Returns [`StoreError`] only when a year file cannot be written; network
/// failures are logged and skipped.
#[instrument(skip_all, fields(from = options.years.start(), to = options.years.end()))]
pub async fn harvest(
    catalog: &CatalogClient,
    archive: &ArchiveClient,
    store: &ProceedingsStore,
    options: &HarvestOptions,
) -> Result<HarvestReport, StoreError> {
    let mut report = HarvestReport::default();
    let last_year = *options.years.end();

    for year in options.years.clone() {
        info!(year, "Fetching catalog entries");
        match catalog.fetch_year(year).await {
            Ok(entries) => {
                let records = harvest_entries(archive, entries, year, &mut report).await;
                let path = store.save(year, &records)?;
                info!(year, count = records.len(), path = %path.display(), "Saved proceedings file");
                report.records += records.len();
                report.years_written.push(year);
            }
            Err(error) => {
                warn!(year, error = %error, "Failed to fetch catalog entries; skipping year");
                report.years_failed.push(year);
            }
        }

        if year != last_year && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    info!(
        written = report.years_written.len(),
        failed = report.years_failed.len(),
        records = report.records,
        "Harvest complete"
    );
    Ok(report)
}

async fn harvest_entries(
    archive: &ArchiveClient,
    entries: Vec<CatalogEntry>,
    year: i32,
    report: &mut HarvestReport,
) -> Vec<PaperRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let lookup = ArchiveLookup::from_result(archive.search_by_title(&entry.title).await);
        match &lookup {
            ArchiveLookup::Found(matched) => {
                report.archive_matches += 1;
                warn_on_title_drift(&entry.title, matched);
            }
            ArchiveLookup::NotFound => debug!(title = %entry.title, "No archival match"),
            ArchiveLookup::Failed(error) => {
                report.archive_failures += 1;
                warn!(title = %entry.title, error = %error, "Archive search failed; leaving archival fields empty");
            }
        }
        records.push(build_record(entry, &lookup, year));
    }
    records
}

/// Logs when the archival hit's title differs noticeably from the catalog title.
///
/// The first hit is kept regardless; this only surfaces likely mismatches.
fn warn_on_title_drift(catalog_title: &str, matched: &ArchiveMatch) {
    let Some(archive_title) = matched.title.as_deref() else {
        return;
    };
    let similarity = title_similarity(catalog_title, archive_title);
    if similarity < TITLE_DRIFT_WARNING_THRESHOLD {
        warn!(
            catalog_title,
            archive_title,
            similarity,
            "Archival match title differs from catalog title"
        );
    }
}

/// Case-insensitive normalized Levenshtein similarity, ignoring a trailing period.
#[must_use]
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let clean = |s: &str| s.trim().trim_end_matches('.').to_lowercase();
    normalized_levenshtein(&clean(a), &clean(b))
}
