//! Abstract text cleanup: markup removal and ligature expansion.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("tag pattern is valid")
});

#[allow(clippy::expect_used)]
static HTML_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&[a-z]+;").expect("entity pattern is valid")
});

/// Code points left behind by PDF text extraction and their replacements.
pub const LIGATURE_REPLACEMENTS: [(char, &str); 7] = [
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB00}', "ff"),
    ('\u{F6D9}', ""),
    ('\u{FFFF}', ""),
];

/// Replaces ligature and private-use code points with ASCII.
#[must_use]
pub fn replace_ligatures(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match LIGATURE_REPLACEMENTS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => out.push_str(to),
            None => out.push(ch),
        }
    }
    out
}

fn clean_once(text: &str) -> String {
    let without_tags = HTML_TAG.replace_all(text, "");
    let without_entities = HTML_ENTITY.replace_all(&without_tags, "");
    replace_ligatures(&without_entities)
}

/// Strips HTML tags and entities and expands ligatures.
///
/// Passes repeat until the text stops changing, so removing one construct
/// can never expose another one for a later run: `clean_abstract` applied to
/// its own output is a no-op. After the first pass no ligatures remain, so
/// every further pass only deletes and the loop terminates.
#[must_use]
pub fn clean_abstract(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
