//! Candidate ticker extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Market and index names that look like tickers but are not.
pub const DENYLIST: [&str; 4] = ["HOSE", "HNX", "UPCOM", "VNINDEX"];

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{3,5}\b").expect("valid ticker regex"));

/// Extract candidate tickers from an article's combined title and body text.
///
/// A candidate is a whole word of 3 to 5 uppercase Latin letters that is not
/// a denylisted market name. No dictionary check is made, so ordinary
/// acronyms come through as well.
///
/// Each ticker appears once, in order of first appearance.
#[must_use]
pub fn extract_tickers(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    TICKER_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| !DENYLIST.contains(token))
        // The pattern cannot match digits; kept as a guard should it widen.
        .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
        .filter(|token| seen.insert(*token))
        .map(str::to_string)
        .collect()
}
