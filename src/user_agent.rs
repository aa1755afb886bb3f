//! Shared User-Agent strings for API and PDF clients.
//!
//! Single source for project URL and UA format so catalog, archive, and PDF
//! traffic stay consistent and easy to update.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/proceedings-trends";

/// Browser User-Agent for PDF fetches.
///
/// Some publisher hosts answer 406 to non-browser agents asking for PDFs, so
/// PDF downloads always present as a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Default User-Agent for catalog and archive API requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("proceedings-trends/{version} (research-tool; +{PROJECT_UA_URL})")
}
