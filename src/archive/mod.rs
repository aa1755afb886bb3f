//! Zenodo archival API client.
//!
//! The archive is used four ways:
//! - title search to find a paper's DOI, identifier, and description
//! - file listing to locate a downloadable PDF for a record
//! - version statistics to rank papers by downloads
//! - BibTeX export for citations
//!
//! Title search takes the first hit only and applies no similarity threshold.
//! A wrong or missing match is indistinguishable from a correct one at this
//! layer; callers that care can compare [`ArchiveMatch::title`] themselves.

mod error;
mod types;

pub use error::ArchiveError;
pub use types::ArchiveMatch;

use reqwest::{Client, Response};
use tracing::{debug, instrument};
use url::Url;

use crate::http_client::{HttpTimeouts, build_http_client};
use crate::user_agent;

use types::{FileListing, RecordSearchResponse};

/// Default Zenodo base URL.
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://zenodo.org";

/// Number of versions requested when reading download statistics.
const VERSION_PAGE_SIZE: &str = "5";

/// Client for the Zenodo REST API.
pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    /// Creates a client against the public Zenodo API.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Client`] if HTTP client construction fails.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, ArchiveError> {
        Self::with_base_url(DEFAULT_ARCHIVE_BASE_URL, timeouts)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Client`] if HTTP client construction fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> Result<Self, ArchiveError> {
        let client = build_http_client("archive", user_agent::default_api_user_agent(), timeouts)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Searches records by free-text title and returns the first hit.
    ///
    /// `/` in the title is replaced by a space before querying, since the
    /// search syntax treats it as a regex delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] on transport failure, non-success status, or
    /// an unexpected body. An empty hit list is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn search_by_title(&self, title: &str) -> Result<Option<ArchiveMatch>, ArchiveError> {
        let query = title.replace('/', " ");
        let url = self.url_with_params("/api/records", &[("q", &query), ("size", "1")])?;
        let response = self.get(url.clone()).await?;
        let body = response
            .json::<RecordSearchResponse>()
            .await
            .map_err(|e| ArchiveError::parse(url.as_str(), e))?;

        let matched = body.hits.hits.into_iter().next().map(ArchiveMatch::from);
        debug!(found = matched.is_some(), "Archive title search finished");
        Ok(matched)
    }

    /// Returns the key of the first file attached to record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] on transport failure, non-success status, or
    /// an unexpected body. A record without files is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn first_file_key(&self, id: &str) -> Result<Option<String>, ArchiveError> {
        let url = self.url(&format!("/api/records/{}/files", urlencoding::encode(id)))?;
        let response = self.get(url.clone()).await?;
        let listing = response
            .json::<FileListing>()
            .await
            .map_err(|e| ArchiveError::parse(url.as_str(), e))?;
        Ok(listing.entries.into_iter().next().map(|entry| entry.key))
    }

    /// Builds the public download URL for file `key` of record `id`.
    #[must_use]
    pub fn file_download_url(&self, id: &str, key: &str) -> String {
        format!(
            "{}/records/{}/files/{}",
            self.base_url,
            urlencoding::encode(id),
            urlencoding::encode(key)
        )
    }

    /// Resolves a PDF download URL for record `id` from its first file.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] when the file listing cannot be fetched.
    pub async fn resolve_file_url(&self, id: &str) -> Result<Option<String>, ArchiveError> {
        Ok(self
            .first_file_key(id)
            .await?
            .map(|key| self.file_download_url(id, &key)))
    }

    /// Fetches the download count for record `id`.
    ///
    /// The versions listing is read in version order and the count of the
    /// last listed version wins.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] on transport failure, non-success status, or
    /// an unexpected body.
    #[instrument(skip(self))]
    pub async fn download_count(&self, id: &str) -> Result<Option<u64>, ArchiveError> {
        let url = self.url_with_params(
            &format!("/api/records/{}/versions", urlencoding::encode(id)),
            &[
                ("size", VERSION_PAGE_SIZE),
                ("sort", "version"),
                ("allversions", "true"),
            ],
        )?;
        let response = self.get(url.clone()).await?;
        let body = response
            .json::<RecordSearchResponse>()
            .await
            .map_err(|e| ArchiveError::parse(url.as_str(), e))?;

        let downloads = body
            .hits
            .hits
            .iter()
            .rev()
            .find_map(|hit| hit.stats.as_ref().and_then(|stats| stats.downloads));
        debug!(?downloads, "Archive download statistics fetched");
        Ok(downloads)
    }

    /// Fetches the BibTeX export for record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] on transport failure or non-success status.
    #[instrument(skip(self))]
    pub async fn bibtex_citation(&self, id: &str) -> Result<String, ArchiveError> {
        let url = self.url(&format!("/records/{}/export/bibtex", urlencoding::encode(id)))?;
        let response = self.get(url.clone()).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ArchiveError::parse(url.as_str(), e))?;
        Ok(text.trim().to_string())
    }

    async fn get(&self, url: Url) -> Result<Response, ArchiveError> {
        debug!(api_url = %url, "Calling archive API");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ArchiveError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Archive API error");
            return Err(ArchiveError::http_status(url.as_str(), status.as_u16()));
        }
        Ok(response)
    }

    fn url(&self, path: &str) -> Result<Url, ArchiveError> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse(&raw).map_err(|_| ArchiveError::InvalidUrl { url: raw })
    }

    fn url_with_params(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ArchiveError> {
        let raw = format!("{}{path}", self.base_url);
        Url::parse_with_params(&raw, params).map_err(|_| ArchiveError::InvalidUrl { url: raw })
    }
}

impl std::fmt::Debug for ArchiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
