//! Turns one AI label into an ordered set of catalog search terms.
//!
//! `expand` is the primary expansion (verbatim description, tokens, synonym
//! injection). `expand_alternatives` is the separate fallback lookup the
//! pipeline runs only when the primary terms found nothing.

use std::collections::HashSet;

use crate::services::matcher::analysis::normalizer::{normalize_term, tokenize};
use crate::services::matcher::models::types::CandidateLabel;
use crate::services::matcher::state::tables::MatchTables;

/// Insertion-ordered, deduplicated, lowercase term list.
#[derive(Debug, Default, Clone)]
pub struct OrderedTerms {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedTerms {
    pub fn push(&mut self, term: &str) {
        let term = normalize_term(term);
        if term.is_empty() || !self.seen.insert(term.clone()) {
            return;
        }
        self.terms.push(term);
    }

    pub fn extend<'a>(&mut self, terms: impl IntoIterator<Item = &'a String>) {
        for term in terms {
            self.push(term);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.terms
    }
}

/// Primary expansion of a label.
///
/// The first element is always the normalized verbatim description (the
/// "primary term"), followed by its tokens and any synonym-table terms whose
/// trigger occurs in the description.
pub fn expand(label: &CandidateLabel, tables: &MatchTables) -> Vec<String> {
    let description = normalize_term(&label.description);
    let mut terms = OrderedTerms::default();

    // Primary term goes first even when blank so callers can rely on index 0.
    terms.terms.push(description.clone());
    terms.seen.insert(description.clone());

    for token in tokenize(&description) {
        terms.push(&token);
    }

    for rule in &tables.synonyms {
        let triggered = rule
            .triggers
            .iter()
            .map(|t| normalize_term(t))
            .any(|t| !t.is_empty() && description.contains(&t));
        if triggered {
            terms.extend(&rule.terms);
        }
    }

    terms.into_vec()
}

/// Fallback terms from the alternative-terms table.
///
/// A key applies when it occurs in the description, when the description
/// occurs in the key, or when every key token is approximately equal
/// (Jaro-Winkler) to some description token.
pub fn expand_alternatives(label: &CandidateLabel, tables: &MatchTables) -> Vec<String> {
    let description = normalize_term(&label.description);
    let description_tokens = tokenize(&description);
    let mut terms = OrderedTerms::default();

    for alternative in &tables.alternatives {
        if key_matches(
            &description,
            &description_tokens,
            &alternative.key,
            tables.alternative_similarity,
        ) {
            terms.extend(&alternative.terms);
        }
    }

    terms.into_vec()
}

fn key_matches(description: &str, description_tokens: &[String], key: &str, threshold: f64) -> bool {
    let key = normalize_term(key);
    if key.is_empty() || description.is_empty() {
        return false;
    }
    if description.contains(&key) || (description.chars().count() > 2 && key.contains(description))
    {
        return true;
    }

    let key_tokens = tokenize(&key);
    !key_tokens.is_empty()
        && key_tokens.iter().all(|key_token| {
            description_tokens
                .iter()
                .any(|token| strsim::jaro_winkler(key_token, token) >= threshold)
        })
}

#[cfg(test)]
#[path = "../tests/analysis/term_expander_tests.rs"]
mod tests;
