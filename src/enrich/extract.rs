//! Line-scan heuristic that isolates the abstract paragraph of a paper.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static ABSTRACT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\babstract\b").expect("abstract marker pattern is valid")
});

#[allow(clippy::expect_used)]
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d\.|Background|Introduction|System Overview|Methods|References)")
        .expect("section header pattern is valid")
});

/// Extracts the abstract from the plain text of a paper.
///
/// Scans line by line. A line containing the word "abstract" starts capture
/// and is itself dropped. Capture ends, without the terminating line, at the
/// first blank line or a line opening with a numbered section (`1.`) or one of
/// the usual section headings. Captured lines are trimmed and joined with
/// single spaces.
///
/// Returns `None` when no marker is found or nothing was captured.
#[must_use]
pub fn extract_abstract(text: &str) -> Option<String> {
    let mut captured: Vec<&str> = Vec::new();
    let mut capturing = false;

    for line in text.lines() {
        if ABSTRACT_MARKER.is_match(line) {
            capturing = true;
            continue;
        }
        if !capturing {
            continue;
        }
        if line.trim().is_empty() || SECTION_HEADER.is_match(line) {
            break;
        }
        captured.push(line.trim());
    }

    let joined = captured.join(" ");
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}
