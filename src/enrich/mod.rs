//! Abstract enrichment and cleanup for proceedings files.
//!
//! - [`extract_abstract`] - line-scan heuristic over PDF text
//! - [`PdfFetcher`] - PDF download into a scoped temporary file + text extraction
//! - [`enrich_folder`] - fills missing abstracts for every year file
//! - [`clean_folder`] - strips markup and ligatures from every stored abstract

mod clean;
mod extract;
mod pdf;

pub use clean::{LIGATURE_REPLACEMENTS, clean_abstract, replace_ligatures};
pub use extract::extract_abstract;
pub use pdf::{PdfError, PdfFetcher, extract_pdf_text};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::archive::{ArchiveClient, ArchiveError};
use crate::record::PaperRecord;
use crate::store::{ProceedingsStore, StoreError};

/// What happened when enriching a single record.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// An abstract was extracted and stored on the record.
    Extracted,
    /// No usable link and no archival identifier to resolve one.
    NoArchiveIdentifier,
    /// The archival record lists no files.
    NoArchiveFiles,
    /// The archival file listing could not be fetched.
    ArchiveLookupFailed(ArchiveError),
    /// The PDF could not be downloaded.
    DownloadFailed(PdfError),
    /// The PDF text held no recognizable abstract.
    NoAbstractFound,
}

impl ExtractionOutcome {
    /// True when the record now has an extracted abstract.
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted)
    }
}

/// Summary of an enrichment run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichReport {
    /// Year files rewritten.
    pub files: usize,
    /// Year files that could not be read.
    pub files_skipped: usize,
    /// Records that needed an abstract.
    pub attempted: usize,
    /// Records that received one.
    pub extracted: usize,
    /// Records left unchanged after an attempt.
    pub failed: usize,
    /// PDF links resolved through the archive and written to `ee`.
    pub urls_resolved: usize,
}

/// Summary of a cleanup run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    /// Year files rewritten.
    pub files: usize,
    /// Year files that could not be read and were left untouched.
    pub files_skipped: usize,
    /// Abstracts whose text changed.
    pub abstracts_changed: usize,
}

/// True when `link` is an absolute `https` URL usable as a PDF source.
#[must_use]
pub fn is_web_link(link: &str) -> bool {
    Url::parse(link).is_ok_and(|url| url.scheme() == "https")
}

/// Fills in the abstract of one record from its PDF.
///
/// Uses `ee` when it is a web link. Otherwise resolves the first archival
/// file of the record and writes its URL to `ee` before downloading, so the
/// link is kept even when extraction then fails.
pub async fn enrich_record(
    record: &mut PaperRecord,
    archive: &ArchiveClient,
    fetcher: &PdfFetcher,
) -> ExtractionOutcome {
    let url = match record.ee.as_deref().filter(|ee| is_web_link(ee)) {
        Some(ee) => ee.to_string(),
        None => {
            let Some(id) = record.zenodo_id.as_deref() else {
                return ExtractionOutcome::NoArchiveIdentifier;
            };
            match archive.resolve_file_url(id).await {
                Ok(Some(url)) => {
                    record.ee = Some(url.clone());
                    url
                }
                Ok(None) => return ExtractionOutcome::NoArchiveFiles,
                Err(error) => return ExtractionOutcome::ArchiveLookupFailed(error),
            }
        }
    };

    let text = match fetcher.fetch_text(&url).await {
        Ok(text) => text,
        Err(error) => return ExtractionOutcome::DownloadFailed(error),
    };

    match extract_abstract(&text) {
        Some(found) => {
            record.r#abstract = Some(found);
            ExtractionOutcome::Extracted
        }
        None => ExtractionOutcome::NoAbstractFound,
    }
}

/// Enriches every record needing an abstract in one set of records.
///
/// Returns `(attempted, extracted, urls_resolved)`.
pub async fn enrich_records(
    records: &mut [PaperRecord],
    archive: &ArchiveClient,
    fetcher: &PdfFetcher,
    progress: &ProgressBar,
) -> (usize, usize, usize) {
    let mut attempted = 0;
    let mut extracted = 0;
    let mut urls_resolved = 0;

    for record in records.iter_mut().filter(|record| record.needs_abstract()) {
        attempted += 1;
        progress.set_message(record.title.clone());
        debug!(title = %record.title, "Extracting abstract");

        let ee_before = record.ee.clone();
        let outcome = enrich_record(record, archive, fetcher).await;
        if record.ee != ee_before {
            urls_resolved += 1;
        }

        match &outcome {
            ExtractionOutcome::Extracted => extracted += 1,
            ExtractionOutcome::NoArchiveIdentifier => {
                warn!(title = %record.title, "No usable link and no archival identifier");
            }
            ExtractionOutcome::NoArchiveFiles => {
                warn!(title = %record.title, "Archival record lists no files");
            }
            ExtractionOutcome::ArchiveLookupFailed(error) => {
                warn!(title = %record.title, error = %error, "Could not resolve PDF link");
            }
            ExtractionOutcome::DownloadFailed(error) => {
                warn!(title = %record.title, error = %error, "Failed to fetch the PDF file");
            }
            ExtractionOutcome::NoAbstractFound => {
                warn!(title = %record.title, "Failed to extract abstract");
            }
        }
        progress.inc(1);
    }

    (attempted, extracted, urls_resolved)
}

/// Runs enrichment over every year file in the store, rewriting each file.
///
/// # Errors
///
/// Returns [`StoreError`] when the folder cannot be listed or a file cannot
/// be written. Unreadable files are logged and skipped.
#[instrument(skip_all, fields(dir = %store.dir().display()))]
pub async fn enrich_folder(
    store: &ProceedingsStore,
    archive: &ArchiveClient,
    fetcher: &PdfFetcher,
    show_progress: bool,
) -> Result<EnrichReport, StoreError> {
    let mut report = EnrichReport::default();

    for file in store.list_year_files()? {
        info!(year = file.year, "Processing proceedings file");
        let mut records = match store.load_path(&file.path) {
            Ok(records) => records,
            Err(error) => {
                warn!(error = %error, "Skipping unreadable proceedings file");
                report.files_skipped += 1;
                continue;
            }
        };

        let pending = records.iter().filter(|record| record.needs_abstract()).count();
        let progress = progress_bar(pending, show_progress);
        let (attempted, extracted, resolved) =
            enrich_records(&mut records, archive, fetcher, &progress).await;
        progress.finish_and_clear();

        store.save_path(&file.path, &records)?;
        info!(year = file.year, attempted, extracted, "Processed proceedings file");

        report.files += 1;
        report.attempted += attempted;
        report.extracted += extracted;
        report.failed += attempted - extracted;
        report.urls_resolved += resolved;
    }

    Ok(report)
}

/// Cleans every non-empty abstract in the store and rewrites each file.
///
/// # Errors
///
/// Returns [`StoreError`] when the folder cannot be listed or a cleaned file
/// cannot be written. Unreadable files are logged and skipped.
#[instrument(skip_all, fields(dir = %store.dir().display()))]
pub fn clean_folder(store: &ProceedingsStore) -> Result<CleanReport, StoreError> {
    let mut report = CleanReport::default();

    for file in store.list_year_files()? {
        let mut records = match store.load_path(&file.path) {
            Ok(records) => records,
            Err(error) => {
                warn!(year = file.year, error = %error, "Skipping unreadable proceedings file");
                report.files_skipped += 1;
                continue;
            }
        };
        let changed = clean_records(&mut records);
        store.save_path(&file.path, &records)?;
        debug!(year = file.year, changed, "Cleaned proceedings file");
        report.files += 1;
        report.abstracts_changed += changed;
    }

    info!(
        files = report.files,
        skipped = report.files_skipped,
        changed = report.abstracts_changed,
        "Abstract cleanup complete"
    );
    Ok(report)
}

/// Cleans the abstracts of `records` in place, returning how many changed.
pub fn clean_records(records: &mut [PaperRecord]) -> usize {
    let mut changed = 0;
    for record in records {
        let Some(text) = record.r#abstract.as_deref().filter(|text| !text.is_empty()) else {
            continue;
        };
        let cleaned = clean_abstract(text);
        if cleaned != text {
            record.r#abstract = Some(cleaned);
            changed += 1;
        }
    }
    changed
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible || len == 0 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}
