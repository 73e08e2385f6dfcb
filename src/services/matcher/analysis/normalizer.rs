//! Text normalization for AI labels and catalog fields.
//! Handles case folding, tokenization, and case-insensitive containment.

use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for splitting labels into tokens (whitespace and hyphens).
static RE_TOKEN_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-]+").expect("Invalid regex"));

/// Compiled regex for collapsing runs of whitespace.
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Minimum token length kept by `tokenize` (tokens must be longer than this).
const MIN_TOKEN_CHARS: usize = 2;

/// Normalize a term for lookup.
///
/// Pipeline:
/// 1. Trim surrounding whitespace
/// 2. Lowercase
/// 3. Collapse inner whitespace to single spaces
pub fn normalize_term(text: &str) -> String {
    RE_WHITESPACE
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// Split text into lowercase tokens longer than two characters.
///
/// Splits on whitespace and hyphens, then trims punctuation from token edges,
/// so `"plastic-bottle, empty"` yields `["plastic", "bottle", "empty"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    RE_TOKEN_SPLIT
        .split(&text.to_lowercase())
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .map(|token| token.to_string())
        .collect()
}

/// Case-insensitive substring test. An empty needle never matches.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive equality after trimming.
pub fn eq_ci(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// `Some(text)` only when the optional field carries non-blank text.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Whether any keyword occurs in `text` (case-insensitive substring).
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && lower.contains(&k))
}

/// Whether any keyword starts a word of `text`.
///
/// "bag" matches "bags" but not "garbage" or "handbag". Multi-word keywords
/// must appear as consecutive words, the last one again by prefix.
pub fn has_word_prefix(text: &str, keywords: &[String]) -> bool {
    let words = split_words(text);
    keywords.iter().any(|keyword| {
        let parts = split_words(keyword);
        let Some((last, leading)) = parts.split_last() else {
            return false;
        };
        words.windows(parts.len()).any(|window| {
            window[..leading.len()] == *leading && window[leading.len()].starts_with(last.as_str())
        })
    })
}

fn split_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Whether any keyword equals one of the whole words of `text`.
///
/// Used for short markers like "soft"/"hard" where substring tests would
/// misfire on words such as "hardwood".
pub fn has_word(text: &str, keywords: &[String]) -> bool {
    let words = split_words(text);
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| words.iter().any(|w| *w == k))
}

#[cfg(test)]
#[path = "../tests/analysis/normalizer_tests.rs"]
mod tests;
