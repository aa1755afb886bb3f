//! Archival API response types.

use serde::{Deserialize, Deserializer};

/// Envelope shared by the search and versions endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordSearchResponse {
    pub hits: RecordHits,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordHits {
    #[serde(default)]
    pub hits: Vec<RecordHit>,
}

/// One archival record as returned by search or versions listing.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordHit {
    #[serde(default, deserialize_with = "identifier_as_string")]
    pub id: Option<String>,
    pub doi: Option<String>,
    #[serde(default)]
    pub metadata: RecordMetadata,
    pub stats: Option<RecordStats>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordStats {
    pub downloads: Option<u64>,
}

/// Response of the record file listing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct FileListing {
    #[serde(default)]
    pub entries: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileEntry {
    pub key: String,
}

/// Best archival match for a title search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMatch {
    /// Archival record identifier.
    pub id: Option<String>,
    /// Record DOI.
    pub doi: Option<String>,
    /// Record title, used only for match-quality diagnostics.
    pub title: Option<String>,
    /// Record description, used as the paper abstract.
    pub description: Option<String>,
}

impl From<RecordHit> for ArchiveMatch {
    fn from(hit: RecordHit) -> Self {
        Self {
            id: hit.id,
            doi: hit.doi,
            title: hit.metadata.title,
            description: hit.metadata.description,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

fn identifier_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n.to_string()),
        Some(NumberOrText::Text(text)) => Some(text),
        None => None,
    })
}
