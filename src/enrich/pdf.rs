//! PDF download and text extraction.
//!
//! Each fetch streams the body into its own temporary file, which is removed
//! when the fetch returns, whatever the outcome. Unreadable PDFs yield empty
//! text rather than an error.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};

use crate::http_client::{ClientBuildError, HttpTimeouts, build_http_client};
use crate::user_agent::BROWSER_USER_AGENT;

/// Errors that prevent a PDF from being obtained at all.
#[derive(Debug, Error)]
pub enum PdfError {
    /// Transport error while requesting or streaming the PDF.
    #[error("network error fetching PDF {url}: {source}")]
    Network {
        /// PDF URL.
        url: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The host answered with a non-success status.
    #[error("HTTP {status} fetching PDF {url}")]
    HttpStatus {
        /// PDF URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The temporary file could not be created or written.
    #[error("IO error writing temporary PDF {path}: {source}")]
    Io {
        /// Temporary file (or scratch folder) path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// HTTP client construction failed.
    #[error(transparent)]
    Client(#[from] ClientBuildError),
}

/// Downloads PDFs and returns their plain text.
pub struct PdfFetcher {
    client: Client,
    scratch_dir: Option<PathBuf>,
}

impl PdfFetcher {
    /// Creates a fetcher writing temporary files to `scratch_dir`
    /// (the system temp folder when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Client`] if HTTP client construction fails.
    pub fn new(timeouts: HttpTimeouts, scratch_dir: Option<PathBuf>) -> Result<Self, PdfError> {
        let client = build_http_client("pdf", BROWSER_USER_AGENT, timeouts)?;
        Ok(Self {
            client,
            scratch_dir,
        })
    }

    /// Downloads `url` and extracts its text.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] when the PDF cannot be downloaded. A downloaded
    /// file that cannot be parsed is not an error: the text is empty.
    #[instrument(skip(self))]
    pub async fn fetch_text(&self, url: &str) -> Result<String, PdfError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/pdf")
            .send()
            .await
            .map_err(|source| PdfError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PdfError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let temp = self.create_temp_file()?;
        let bytes = stream_to_file(response, url, temp.path()).await?;
        debug!(bytes, path = %temp.path().display(), "PDF downloaded");

        let path = temp.path().to_path_buf();
        let text = match tokio::task::spawn_blocking(move || extract_pdf_text(&path)).await {
            Ok(text) => text,
            Err(join_error) => {
                warn!(error = %join_error, "PDF text extraction panicked; treating as empty");
                String::new()
            }
        };

        // `temp` is dropped here, removing the file.
        Ok(text)
    }

    fn create_temp_file(&self) -> Result<NamedTempFile, PdfError> {
        let result = match &self.scratch_dir {
            Some(dir) => tempfile::Builder::new()
                .prefix("paper-")
                .suffix(".pdf")
                .tempfile_in(dir),
            None => tempfile::Builder::new()
                .prefix("paper-")
                .suffix(".pdf")
                .tempfile(),
        };
        result.map_err(|source| PdfError::Io {
            path: self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir),
            source,
        })
    }
}

impl std::fmt::Debug for PdfFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFetcher")
            .field("scratch_dir", &self.scratch_dir)
            .finish_non_exhaustive()
    }
}

async fn stream_to_file(
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, PdfError> {
    let io_error = |source: std::io::Error| PdfError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = tokio::fs::File::create(path).await.map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|source| PdfError::Network {
            url: url.to_string(),
            source,
        })?;
        writer.write_all(&chunk).await.map_err(io_error)?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(io_error)?;
    Ok(bytes_written)
}

/// Extracts all text from the PDF at `path`, or an empty string when the
/// file cannot be opened or parsed.
#[must_use]
pub fn extract_pdf_text(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "Could not load PDF");
            String::new()
        }
    }
}
