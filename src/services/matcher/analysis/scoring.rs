//! Scoring primitives for the candidate scorer.
//!
//! Two separate scores live here:
//! - the intra-label entry rank (integer bonuses) that picks one entry per label;
//! - `db_match_quality`, multiplied by label confidence into the cross-label
//!   `combined_score`.

use crate::services::matcher::analysis::normalizer::{contains_any, contains_ci, eq_ci};
use crate::services::matcher::analysis::variant_resolver::{
    is_clean_condition, material_alignment, MaterialAlignment,
};
use crate::services::matcher::models::types::{
    CandidateLabel, CatalogEntry, ScoredCandidate, SearchHit,
};
use crate::services::matcher::state::tables::MatchTables;

const MATERIAL_EXACT_RANK: i32 = 600;
const MATERIAL_PARTIAL_RANK: i32 = 400;
const EXACT_NAME_RANK: i32 = 1000;
const CONTAINS_PRIMARY_RANK: i32 = 300;
const CLEAN_CONDITION_RANK: i32 = 200;
const SORTED_HOME_RANK: i32 = 150;
const RESIDUAL_HOME_RANK: i32 = -200;

const EXACT_NAME_FACTOR: f32 = 2.0;
const WELL_SORTED_FACTOR: f32 = 1.2;
const RESIDUAL_FACTOR: f32 = 0.5;
const GENERIC_WRAP_FACTOR: f32 = 0.7;

/// Inputs shared by every entry-ranking rule for one label.
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    /// Normalized verbatim label description.
    pub primary_term: &'a str,
    pub material_hint: Option<&'a str>,
    pub tables: &'a MatchTables,
}

pub type RankingRule = fn(&CatalogEntry, &RankingContext<'_>) -> i32;

/// Applied in priority order; each returns its delta.
pub const ENTRY_RANKING_RULES: &[(&str, RankingRule)] = &[
    ("material_alignment", material_alignment_rank),
    ("exact_name", exact_name_rank),
    ("contains_primary_term", contains_primary_rank),
    ("clean_condition", clean_condition_rank),
    ("home_category", home_category_rank),
];

pub fn material_alignment_rank(entry: &CatalogEntry, ctx: &RankingContext<'_>) -> i32 {
    match material_alignment(entry.material.as_deref(), ctx.material_hint) {
        MaterialAlignment::Exact => MATERIAL_EXACT_RANK,
        MaterialAlignment::Partial => MATERIAL_PARTIAL_RANK,
        MaterialAlignment::None => 0,
    }
}

pub fn exact_name_rank(entry: &CatalogEntry, ctx: &RankingContext<'_>) -> i32 {
    if is_exact_name(entry, ctx.primary_term) {
        EXACT_NAME_RANK
    } else {
        0
    }
}

/// Name and synonyms each add the bonus when they contain the primary term.
pub fn contains_primary_rank(entry: &CatalogEntry, ctx: &RankingContext<'_>) -> i32 {
    let mut rank = 0;
    if contains_ci(&entry.name, ctx.primary_term) {
        rank += CONTAINS_PRIMARY_RANK;
    }
    if entry
        .synonyms
        .as_deref()
        .is_some_and(|synonyms| contains_ci(synonyms, ctx.primary_term))
    {
        rank += CONTAINS_PRIMARY_RANK;
    }
    rank
}

pub fn clean_condition_rank(entry: &CatalogEntry, ctx: &RankingContext<'_>) -> i32 {
    if is_clean_condition(entry, ctx.tables) {
        CLEAN_CONDITION_RANK
    } else {
        0
    }
}

pub fn home_category_rank(entry: &CatalogEntry, ctx: &RankingContext<'_>) -> i32 {
    if ctx.tables.is_residual(&entry.home_category) {
        RESIDUAL_HOME_RANK
    } else {
        SORTED_HOME_RANK
    }
}

pub fn entry_rank(entry: &CatalogEntry, ctx: &RankingContext<'_>) -> i32 {
    ENTRY_RANKING_RULES
        .iter()
        .map(|(_, rule)| rule(entry, ctx))
        .sum()
}

/// Order a label's resolved hits best-first. Equal ranks keep hit order.
pub fn rank_entries(hits: Vec<SearchHit>, ctx: &RankingContext<'_>) -> Vec<(SearchHit, i32)> {
    let mut ranked: Vec<(SearchHit, i32)> = hits
        .into_iter()
        .map(|hit| {
            let rank = entry_rank(&hit.entry, ctx);
            (hit, rank)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn is_exact_name(entry: &CatalogEntry, primary_term: &str) -> bool {
    !primary_term.trim().is_empty() && eq_ci(&entry.name, primary_term)
}

/// Catalog-side match quality of the label's best entry.
///
/// Starts at 1.0; x2.0 on exact name, x1.2 for a well-sorted home category,
/// x0.5 for the residual bucket, x0.7 when the name is a generic foil/wrap.
pub fn db_match_quality(entry: &CatalogEntry, primary_term: &str, tables: &MatchTables) -> f32 {
    let mut quality = 1.0;
    if is_exact_name(entry, primary_term) {
        quality *= EXACT_NAME_FACTOR;
    }
    if tables.is_well_sorted(&entry.home_category) {
        quality *= WELL_SORTED_FACTOR;
    }
    if tables.is_residual(&entry.home_category) {
        quality *= RESIDUAL_FACTOR;
    }
    if contains_any(&entry.name, &tables.generic_wrap_markers) {
        quality *= GENERIC_WRAP_FACTOR;
    }
    quality
}

pub fn score_candidate(
    label: &CandidateLabel,
    entry: CatalogEntry,
    primary_term: &str,
    tables: &MatchTables,
) -> ScoredCandidate {
    let db_match_quality = db_match_quality(&entry, primary_term, tables);
    ScoredCandidate {
        label: label.clone(),
        combined_score: label.confidence * db_match_quality,
        db_match_quality,
        entry,
    }
}

/// Sort candidates by combined score, highest first; ties keep label order.
pub fn rank_candidates(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
#[path = "../tests/analysis/scoring_tests.rs"]
mod tests;
