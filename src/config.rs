//! Explicit pipeline configuration passed to every entry point.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Datelike;

use crate::analysis::ranking::{
    DEFAULT_TOP_FROM_YEAR, DEFAULT_TOP_LIMIT, DEFAULT_TOP_TO_YEAR, RankingOptions,
};
use crate::analysis::{DEFAULT_ANALYSIS_FROM_YEAR, DEFAULT_ANALYSIS_TO_YEAR, KeywordSet};
use crate::archive::{ArchiveClient, ArchiveError, DEFAULT_ARCHIVE_BASE_URL};
use crate::catalog::{CatalogClient, CatalogError, DEFAULT_CATALOG_BASE_URL, DEFAULT_VENUE};
use crate::enrich::{PdfError, PdfFetcher};
use crate::harvest::HarvestOptions;
use crate::http_client::HttpTimeouts;
use crate::store::{DEFAULT_PROCEEDINGS_DIR, ProceedingsStore};

/// First year harvested by default.
pub const DEFAULT_HARVEST_FROM_YEAR: i32 = 2000;
/// Pause between per-year catalog requests.
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
/// Default folder for charts and JSON reports.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Current calendar year in local time.
#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Everything the pipelines need, resolved up front.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub proceedings_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Catalog venue key (`ismir` → `db/conf/ismir/ismir<year>.bht`).
    pub venue: String,
    pub catalog_base_url: String,
    pub archive_base_url: String,
    pub request_delay: Duration,
    pub api_timeouts: HttpTimeouts,
    pub pdf_timeouts: HttpTimeouts,
    /// Folder for temporary PDF files; system temp folder when `None`.
    pub scratch_dir: Option<PathBuf>,
    pub harvest_years: RangeInclusive<i32>,
    pub analysis_years: RangeInclusive<i32>,
    pub ranking_years: RangeInclusive<i32>,
    pub top_limit: usize,
    pub generation_keywords: KeywordSet,
    pub analysis_keywords: KeywordSet,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            proceedings_dir: PathBuf::from(DEFAULT_PROCEEDINGS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            venue: DEFAULT_VENUE.to_string(),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            api_timeouts: HttpTimeouts::api_default(),
            pdf_timeouts: HttpTimeouts::pdf_default(),
            scratch_dir: None,
            harvest_years: DEFAULT_HARVEST_FROM_YEAR..=current_year(),
            analysis_years: DEFAULT_ANALYSIS_FROM_YEAR..=DEFAULT_ANALYSIS_TO_YEAR,
            ranking_years: DEFAULT_TOP_FROM_YEAR..=DEFAULT_TOP_TO_YEAR,
            top_limit: DEFAULT_TOP_LIMIT,
            generation_keywords: KeywordSet::generation(),
            analysis_keywords: KeywordSet::analysis(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn store(&self) -> ProceedingsStore {
        ProceedingsStore::new(&self.proceedings_dir)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError`] when the base URL is invalid or the client cannot be built.
    pub fn catalog_client(&self) -> Result<CatalogClient, CatalogError> {
        CatalogClient::with_base_url(&self.catalog_base_url, &self.venue, self.api_timeouts)
    }

    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the base URL is invalid or the client cannot be built.
    pub fn archive_client(&self) -> Result<ArchiveClient, ArchiveError> {
        ArchiveClient::with_base_url(&self.archive_base_url, self.api_timeouts)
    }

    /// # Errors
    ///
    /// Returns [`PdfError`] when the client cannot be built.
    pub fn pdf_fetcher(&self) -> Result<PdfFetcher, PdfError> {
        PdfFetcher::new(self.pdf_timeouts, self.scratch_dir.clone())
    }

    #[must_use]
    pub fn harvest_options(&self) -> HarvestOptions {
        HarvestOptions {
            years: self.harvest_years.clone(),
            delay: self.request_delay,
        }
    }

    #[must_use]
    pub fn ranking_options(&self) -> RankingOptions {
        RankingOptions {
            years: self.ranking_years.clone(),
            limit: self.top_limit,
        }
    }
}
