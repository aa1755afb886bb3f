//! Shared HTTP client construction policy.
//!
//! Catalog, archive, and PDF clients are all built here so they stay
//! consistent on timeouts, user-agent, compression, and proxy handling.
//! Every client carries an explicit connect and read timeout.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use thiserror::Error;
use tracing::warn;

/// Default connect timeout for every client (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default read timeout for catalog and archive API calls (30 seconds).
pub const DEFAULT_API_READ_TIMEOUT_SECS: u64 = 30;

/// Default read timeout for PDF downloads (2 minutes).
pub const DEFAULT_PDF_READ_TIMEOUT_SECS: u64 = 120;

/// Connect/read timeout pair applied to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// TCP/TLS connect timeout.
    pub connect: Duration,
    /// Whole-request timeout including body read.
    pub read: Duration,
}

impl HttpTimeouts {
    /// Builds a timeout pair from whole seconds.
    #[must_use]
    pub fn from_secs(connect_secs: u64, read_secs: u64) -> Self {
        Self {
            connect: Duration::from_secs(connect_secs),
            read: Duration::from_secs(read_secs),
        }
    }

    /// Defaults for catalog and archive API clients.
    #[must_use]
    pub fn api_default() -> Self {
        Self::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_API_READ_TIMEOUT_SECS)
    }

    /// Defaults for PDF download clients.
    #[must_use]
    pub fn pdf_default() -> Self {
        Self::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PDF_READ_TIMEOUT_SECS)
    }
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self::api_default()
    }
}

/// Failure to construct an HTTP client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// reqwest rejected the builder configuration.
    #[error("HTTP client construction failed for {client}: {source}")]
    Build {
        /// Logical client name (catalog, archive, pdf).
        client: String,
        /// Underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The builder panicked even with the env-proxy fallback.
    #[error("HTTP client construction panicked for {client} while initializing networking")]
    Panic {
        /// Logical client name (catalog, archive, pdf).
        client: String,
    },
}

/// Builds an HTTP client using the shared project policy.
///
/// `client_name` is only used for error messages and logging.
///
/// # Errors
///
/// Returns [`ClientBuildError`] when client construction fails.
pub fn build_http_client(
    client_name: &str,
    user_agent: impl Into<String>,
    timeouts: HttpTimeouts,
) -> Result<Client, ClientBuildError> {
    let user_agent = user_agent.into();

    match try_build_client(&user_agent, timeouts, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed environments panic when querying system proxy
            // settings. The fallback keeps env-proxy support but skips the
            // system lookup.
            warn!(
                client = client_name,
                "HTTP client hit system proxy panic; using env-proxy fallback builder"
            );
            match try_build_client(&user_agent, timeouts, true) {
                Ok(client) => Ok(client),
                Err(BuildClientFailure::Panic) => Err(ClientBuildError::Panic {
                    client: client_name.to_string(),
                }),
                Err(BuildClientFailure::Build(source)) => Err(ClientBuildError::Build {
                    client: client_name.to_string(),
                    source,
                }),
            }
        }
        Err(BuildClientFailure::Build(source)) => Err(ClientBuildError::Build {
            client: client_name.to_string(),
            source,
        }),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn try_build_client(
    user_agent: &str,
    timeouts: HttpTimeouts,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let user_agent = user_agent.to_string();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = base_builder(user_agent, timeouts);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn base_builder(user_agent: String, timeouts: HttpTimeouts) -> ClientBuilder {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.read)
        .user_agent(user_agent)
        .gzip(true)
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    if let Some(proxy) = env_proxy_for_scheme("https")
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    if let Some(proxy) = env_proxy_for_scheme("http")
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn env_proxy_for_scheme(scheme: &str) -> Option<String> {
    match scheme {
        "https" => find_first_proxy_var(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
        "http" => find_first_proxy_var(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
        _ => None,
    }
}

fn find_first_proxy_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
