//! Topic keyword sets and the relevance predicate.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;

use crate::record::PaperRecord;

/// Built-in keywords for the "generation" topic.
pub const GENERATION_KEYWORDS: &[&str] = &[
    "generative ai",
    "algorithmic composition",
    "music generation",
    "generation",
    "generate",
    "composition",
    "ai-driven composition",
    "neural network music",
    "automatic composition",
    "musical creativity",
    "machine-generated music",
    "ai-generated music",
];

/// Built-in keywords for the "analysis" topic.
pub const ANALYSIS_KEYWORDS: &[&str] = &["analysis", "evaluation", "criticism"];

/// Ordered set of lowercase substrings defining a topic.
///
/// Matching is plain substring search: no stemming, no word boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Builds a set from raw keywords, trimming and lowercasing each one.
    /// Order is preserved.
    ///
    /// Blank or whitespace-only keywords are dropped instead of being kept as
    /// an empty substring, which would match every record. A set built only
    /// from blanks is therefore empty, and an empty set matches nothing (see
    /// [`KeywordSet::is_relevant`]).
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        Self { keywords }
    }

    /// The built-in generation topic.
    #[must_use]
    pub fn generation() -> Self {
        Self::new(GENERATION_KEYWORDS)
    }

    /// The built-in analysis topic.
    #[must_use]
    pub fn analysis() -> Self {
        Self::new(ANALYSIS_KEYWORDS)
    }

    /// Keywords in order.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// True iff some keyword occurs in the lowercased title or abstract.
    /// An absent abstract counts as empty text. An empty set matches nothing.
    #[must_use]
    pub fn is_relevant(&self, record: &PaperRecord) -> bool {
        self.matches(&record.title, record.abstract_text())
    }

    /// Relevance test on raw title and abstract text.
    #[must_use]
    pub fn matches(&self, title: &str, abstract_text: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let title = title.to_lowercase();
        let abstract_text = abstract_text.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| title.contains(keyword.as_str()) || abstract_text.contains(keyword.as_str()))
    }
}

/// Loads a keyword set from a file holding one keyword per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// Returns error if the file cannot be read.
#[instrument]
pub fn load_keyword_set(path: &Path) -> Result<KeywordSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read keywords file '{}'", path.display()))?;

    Ok(KeywordSet::new(
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    ))
}
