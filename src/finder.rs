//! Locating citation keys in document text.
//!
//! Documents mark a citation with `@key` or `#key`. The key grammar follows
//! Pandoc: it starts with an alphanumeric character or `_` and may continue
//! with alphanumerics and the punctuation `_:.#$%&-+?<>~/`. Punctuation at the
//! end of a token belongs to the sentence, not the key.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static CITATION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w])[@#]([\w][\w:.#$%&\-+?<>~/]*)")
        .expect("citation marker regex is valid")
});

/// Decides which of the known citation keys a document actually cites.
pub trait CitationFinder {
    /// Return the subset of `candidates` that appears in `text`.
    fn find_citations(&self, text: &str, candidates: &BTreeSet<String>) -> BTreeSet<String>;
}

/// Default finder matching `@key` / `#key` markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerFinder;

impl CitationFinder for MarkerFinder {
    fn find_citations(&self, text: &str, candidates: &BTreeSet<String>) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        for cap in CITATION_MARKER.captures_iter(text) {
            let token = &cap[1];
            if let Some(key) = match_candidate(token, candidates) {
                found.insert(key.to_string());
            }
        }

        found
    }
}

/// Try the raw token first, then peel trailing punctuation one character at a
/// time so `@smith2020.` still finds `smith2020` while `@v1.2` stays intact.
fn match_candidate<'a>(token: &'a str, candidates: &BTreeSet<String>) -> Option<&'a str> {
    let mut key = token;
    loop {
        if candidates.contains(key) {
            return Some(key);
        }
        let last = key.chars().next_back()?;
        if last.is_alphanumeric() || last == '_' {
            return None;
        }
        key = &key[..key.len() - last.len_utf8()];
    }
}
