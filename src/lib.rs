//! Proceedings Trends Core Library
//!
//! Harvests a conference's proceedings metadata from a bibliographic catalog,
//! links each paper to its archival record, fills in abstracts extracted from
//! the papers' PDFs, and tallies keyword-based topic trends per year.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`record`] - Paper record and its on-disk JSON shape
//! - [`store`] - Per-year proceedings files
//! - [`catalog`] - DBLP search client
//! - [`archive`] - Zenodo records, files, statistics and citations
//! - [`harvest`] - Catalog + archive → one file per year
//! - [`enrich`] - PDF abstract extraction and abstract cleanup
//! - [`analysis`] - Keyword tallies, charts and download ranking
//! - [`config`] - Explicit configuration for all pipelines

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod analysis;
pub mod archive;
pub mod catalog;
pub mod config;
pub mod enrich;
pub mod harvest;
pub mod http_client;
pub mod record;
pub mod store;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use analysis::{KeywordSet, TrendReport, TrendSeries, YearTally, analyze_folder};
pub use archive::{ArchiveClient, ArchiveError, ArchiveMatch};
pub use catalog::{CatalogClient, CatalogEntry, CatalogError};
pub use config::PipelineConfig;
pub use enrich::{
    CleanReport, EnrichReport, ExtractionOutcome, PdfError, PdfFetcher, clean_abstract,
    clean_folder, enrich_folder, extract_abstract,
};
pub use harvest::{ArchiveLookup, HarvestOptions, HarvestReport, harvest};
pub use http_client::HttpTimeouts;
pub use record::{PLACEHOLDER_MARKER, PaperRecord};
pub use store::{ProceedingsStore, StoreError};
