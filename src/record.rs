//! Paper record: the per-publication entry stored in proceedings files.
//!
//! Field names on disk are stable (`title`, `author`, `year`, `doi`, `url`,
//! `ee`, `abstract`, `zenodo_id`, `dblp_key`). Optional values are written as
//! JSON `null` so absence survives a round trip through the file.
//!
//! Deserialization is lenient toward files written by earlier tooling: `year`
//! may be a string, `zenodo_id` may be a number, `Abstract` is accepted as a
//! legacy spelling of `abstract`, and missing keys read as absent.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel text marking an abstract that still has to be extracted.
pub const PLACEHOLDER_MARKER: &str = "[TODO]";

/// Base for canonical DOI links.
const DOI_RESOLVER_BASE: &str = "https://doi.org";

/// One publication in a proceedings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Publication title as listed by the catalog.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Author names in catalog order.
    #[serde(default, deserialize_with = "authors_skipping_nulls")]
    pub author: Vec<String>,
    /// Publication year.
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    /// DOI from the archival record.
    #[serde(default)]
    pub doi: Option<String>,
    /// Canonical `https://doi.org/...` link derived from `doi`.
    #[serde(default)]
    pub url: Option<String>,
    /// Electronic-edition link (catalog `ee`, or a resolved archive file URL).
    #[serde(default)]
    pub ee: Option<String>,
    /// Abstract text, possibly containing [`PLACEHOLDER_MARKER`].
    #[serde(rename = "abstract", alias = "Abstract", default)]
    pub r#abstract: Option<String>,
    /// Archival record identifier.
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub zenodo_id: Option<String>,
    /// Source catalog key.
    #[serde(default)]
    pub dblp_key: Option<String>,
}

impl PaperRecord {
    /// True when the abstract is absent, empty, or still the placeholder.
    #[must_use]
    pub fn needs_abstract(&self) -> bool {
        match self.r#abstract.as_deref() {
            None => true,
            Some(text) => text.is_empty() || text.contains(PLACEHOLDER_MARKER),
        }
    }

    /// Returns the abstract, or an empty string when absent.
    #[must_use]
    pub fn abstract_text(&self) -> &str {
        self.r#abstract.as_deref().unwrap_or("")
    }
}

/// Builds the canonical DOI URL for `doi`.
#[must_use]
pub fn doi_url(doi: &str) -> String {
    format!("{DOI_RESOLVER_BASE}/{doi}")
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn authors_skipping_nulls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => i32::try_from(n).ok(),
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

fn lenient_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n.to_string()),
        Some(NumberOrText::Text(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_record() -> PaperRecord {
        PaperRecord {
            title: "Neural Music Generation with Transformers.".to_string(),
            author: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            year: Some(2020),
            doi: Some("10.5281/zenodo.4245".to_string()),
            url: Some(doi_url("10.5281/zenodo.4245")),
            ee: Some("https://example.org/paper.pdf".to_string()),
            r#abstract: None,
            zenodo_id: Some("4245".to_string()),
            dblp_key: Some("conf/ismir/Lovelace20".to_string()),
        }
    }

    #[test]
    fn test_serialize_uses_stable_key_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "abstract",
                "author",
                "dblp_key",
                "doi",
                "ee",
                "title",
                "url",
                "year",
                "zenodo_id"
            ]
        );
        assert!(object["abstract"].is_null(), "absent abstract must be null");
    }

    #[test]
    fn test_deserialize_legacy_string_year_and_numeric_id() {
        let json = serde_json::json!({
            "title": "A Survey of Rhythm Perception",
            "author": ["B. Author"],
            "year": "2019",
            "zenodo_id": 1416,
            "dblp_key": "conf/ismir/Author19"
        });
        let record: PaperRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.year, Some(2019));
        assert_eq!(record.zenodo_id.as_deref(), Some("1416"));
        assert!(record.doi.is_none());
        assert!(record.r#abstract.is_none());
    }

    #[test]
    fn test_deserialize_accepts_capitalised_abstract_key() {
        let json = serde_json::json!({"title": "T", "Abstract": "Legacy text"});
        let record: PaperRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.abstract_text(), "Legacy text");
    }

    #[test]
    fn test_deserialize_null_title_and_authors() {
        let json = serde_json::json!({"title": null, "author": ["A", null, "B"], "dblp_key": null});
        let record: PaperRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.author, vec!["A".to_string(), "B".to_string()]);
        assert!(record.dblp_key.is_none());
    }

    #[test]
    fn test_absent_catalog_key_round_trips_as_null() {
        for json in [
            serde_json::json!({"title": "T", "dblp_key": null}),
            serde_json::json!({"title": "T"}),
        ] {
            let record: PaperRecord = serde_json::from_value(json).unwrap();
            assert!(record.dblp_key.is_none());
            let written = serde_json::to_value(&record).unwrap();
            assert!(written["dblp_key"].is_null(), "got {written}");
            let reread: PaperRecord = serde_json::from_value(written).unwrap();
            assert_eq!(reread, record);
        }
    }

    #[test]
    fn test_needs_abstract_states() {
        let mut record = sample_record();
        assert!(record.needs_abstract());

        record.r#abstract = Some(String::new());
        assert!(record.needs_abstract());

        record.r#abstract = Some("[TODO] add abstract".to_string());
        assert!(record.needs_abstract());

        record.r#abstract = Some("We study rhythm.".to_string());
        assert!(!record.needs_abstract());
    }

    #[test]
    fn test_doi_url_format() {
        assert_eq!(doi_url("10.1234/abc"), "https://doi.org/10.1234/abc");
    }

    #[test]
    fn test_round_trip_preserves_absent_fields() {
        let record = sample_record();
        let text = serde_json::to_string(&record).unwrap();
        let back: PaperRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
