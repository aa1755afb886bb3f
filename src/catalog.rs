//! DBLP catalog client: lists a venue's publications for one year.
//!
//! The catalog is queried through the DBLP publication search API with a
//! table-of-contents key (`toc:db/conf/{venue}/{venue}{year}.bht:`). Each hit
//! is normalized into a [`CatalogEntry`] so the harvester never has to deal
//! with DBLP's one-or-many encodings.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::http_client::{ClientBuildError, HttpTimeouts, build_http_client};
use crate::user_agent;

/// Default DBLP API base URL.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://dblp.uni-trier.de";

/// Default venue key (ISMIR).
pub const DEFAULT_VENUE: &str = "ismir";

/// Maximum hits requested per year.
const MAX_HITS: u32 = 1000;

/// Errors from catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response.
    #[error("catalog request for {year} failed: {source}")]
    Network {
        /// Year being fetched.
        year: i32,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status} for {year}")]
    HttpStatus {
        /// Year being fetched.
        year: i32,
        /// HTTP status code.
        status: u16,
    },

    /// The body was not a DBLP search result.
    #[error("unexpected catalog response format for {year}: {source}")]
    Parse {
        /// Year being fetched.
        year: i32,
        /// Decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured base URL is not a valid URL.
    #[error("invalid catalog base URL '{base_url}'")]
    InvalidBaseUrl {
        /// Offending base URL.
        base_url: String,
    },

    /// HTTP client construction failed.
    #[error(transparent)]
    Client(#[from] ClientBuildError),
}

// ==================== DBLP Response Types ====================

/// A DBLP field that holds either a single value or a list of values.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Single value (e.g. a paper with one author).
    One(T),
    /// Ordered list of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flattens into a vector, preserving order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    hits: SearchHits,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hit: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    info: HitInfo,
}

#[derive(Debug, Default, Deserialize)]
struct HitInfo {
    title: Option<String>,
    authors: Option<HitAuthors>,
    year: Option<TextOrNumber>,
    ee: Option<OneOrMany<String>>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HitAuthors {
    author: OneOrMany<CatalogAuthor>,
}

/// Author entry as encoded by DBLP (`{"@pid": ..., "text": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAuthor {
    /// Display name.
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Number(i64),
    Text(String),
}

impl TextOrNumber {
    fn as_year(&self) -> Option<i32> {
        match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

// ==================== Normalized Entry ====================

/// A catalog hit normalized for the harvester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Title as listed.
    pub title: String,
    /// Author names in listed order.
    pub authors: Vec<String>,
    /// Year from the hit, when parseable.
    pub year: Option<i32>,
    /// First electronic-edition link.
    pub ee: Option<String>,
    /// DBLP record key.
    pub key: Option<String>,
}

/// Normalizes a DBLP author field to an ordered list of names.
///
/// A single author object yields a one-element list; a list keeps its order.
/// Entries without a name are dropped.
#[must_use]
pub fn normalize_authors(authors: OneOrMany<CatalogAuthor>) -> Vec<String> {
    authors
        .into_vec()
        .into_iter()
        .filter_map(|author| author.text)
        .collect()
}

impl From<HitInfo> for CatalogEntry {
    fn from(info: HitInfo) -> Self {
        Self {
            title: info.title.unwrap_or_default(),
            authors: info
                .authors
                .map(|authors| normalize_authors(authors.author))
                .unwrap_or_default(),
            year: info.year.as_ref().and_then(TextOrNumber::as_year),
            ee: info.ee.and_then(|ee| ee.into_vec().into_iter().next()),
            key: info.key.filter(|key| !key.trim().is_empty()),
        }
    }
}

// ==================== CatalogClient ====================

/// Client for the DBLP publication search API.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    venue: String,
}

impl CatalogClient {
    /// Creates a client against the public DBLP API.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Client`] if HTTP client construction fails.
    pub fn new(venue: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_CATALOG_BASE_URL, venue, timeouts)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Client`] if HTTP client construction fails.
    pub fn with_base_url(
        base_url: impl Into<String>,
        venue: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> Result<Self, CatalogError> {
        let client = build_http_client("catalog", user_agent::default_api_user_agent(), timeouts)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            venue: venue.into(),
        })
    }

    /// Builds the search URL for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] when the base URL does not parse.
    pub fn search_url(&self, year: i32) -> Result<Url, CatalogError> {
        let toc = format!("toc:db/conf/{venue}/{venue}{year}.bht:", venue = self.venue);
        let hits = MAX_HITS.to_string();
        Url::parse_with_params(
            &format!("{}/search/publ/api", self.base_url),
            [("q", toc.as_str()), ("h", hits.as_str()), ("format", "json")],
        )
        .map_err(|_| CatalogError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
        })
    }

    /// Fetches every catalog entry for `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure, non-success status, or an
    /// unexpected response body.
    #[instrument(skip(self), fields(venue = %self.venue))]
    pub async fn fetch_year(&self, year: i32) -> Result<Vec<CatalogEntry>, CatalogError> {
        let url = self.search_url(year)?;
        debug!(api_url = %url, "Calling catalog API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Network { year, source })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Catalog API returned error status");
            return Err(CatalogError::HttpStatus {
                year,
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<SearchResponse>()
            .await
            .map_err(|source| CatalogError::Parse { year, source })?;

        let entries: Vec<CatalogEntry> = body
            .result
            .hits
            .hit
            .into_iter()
            .map(|hit| CatalogEntry::from(hit.info))
            .collect();
        debug!(count = entries.len(), "Catalog hits parsed");
        Ok(entries)
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("venue", &self.venue)
            .finish_non_exhaustive()
    }
}
