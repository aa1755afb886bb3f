//! Error types for archival API operations.

use thiserror::Error;

use crate::http_client::ClientBuildError;

/// Errors that can occur when talking to the archival API.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The request never produced a response.
    #[error("archive request to {url} failed: {source}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The archive answered with a non-success status.
    #[error("archive returned HTTP {status} for {url}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body did not have the expected shape.
    #[error("unexpected archive response format from {url}: {source}")]
    Parse {
        /// Requested URL.
        url: String,
        /// Decode error.
        #[source]
        source: reqwest::Error,
    },

    /// A URL could not be built from the configured base.
    #[error("invalid archive URL '{url}'")]
    InvalidUrl {
        /// Offending URL text.
        url: String,
    },

    /// HTTP client construction failed.
    #[error(transparent)]
    Client(#[from] ClientBuildError),
}

impl ArchiveError {
    /// Creates a network error for `url`.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error for `url`.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error for `url`.
    pub fn parse(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Parse {
            url: url.into(),
            source,
        }
    }

    /// Returns the HTTP status code if this is a status error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
