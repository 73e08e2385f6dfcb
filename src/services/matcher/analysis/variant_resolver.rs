//! Picks one representative variant per catalog name.
//!
//! Hits sharing a name (case-insensitive) are scored by a fixed list of named
//! rules; the highest total wins, ties keep the earlier hit.

use std::collections::HashMap;

use crate::services::matcher::analysis::normalizer::{contains_ci, eq_ci, has_word, non_blank};
use crate::services::matcher::models::decision_log::{DecisionLog, DecisionRecord, Stage};
use crate::services::matcher::models::types::{CatalogEntry, SearchHit};
use crate::services::matcher::state::tables::MatchTables;

const MATERIAL_EXACT_BONUS: i32 = 200;
const MATERIAL_PARTIAL_BONUS: i32 = 100;
const PLASTIC_SUBTYPE_BONUS: i32 = 400;
const CLEAN_CONDITION_BONUS: i32 = 200;
const SORTED_HOME_BONUS: i32 = 100;

/// How well an entry's material agrees with the AI material hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialAlignment {
    Exact,
    Partial,
    None,
}

pub fn material_alignment(entry_material: Option<&str>, hint: Option<&str>) -> MaterialAlignment {
    let (Some(material), Some(hint)) = (non_blank(entry_material), non_blank(hint)) else {
        return MaterialAlignment::None;
    };
    if eq_ci(material, hint) {
        MaterialAlignment::Exact
    } else if contains_ci(material, hint) || contains_ci(hint, material) {
        MaterialAlignment::Partial
    } else {
        MaterialAlignment::None
    }
}

pub type VariantRule = fn(&CatalogEntry, Option<&str>, &MatchTables) -> i32;

/// Applied in this order; each returns its delta.
pub const VARIANT_RULES: &[(&str, VariantRule)] = &[
    ("material_match", material_match_bonus),
    ("plastic_subtype", plastic_subtype_bonus),
    ("clean_condition", clean_condition_bonus),
    ("sorted_home_category", sorted_home_bonus),
];

pub fn material_match_bonus(entry: &CatalogEntry, hint: Option<&str>, _: &MatchTables) -> i32 {
    match material_alignment(entry.material.as_deref(), hint) {
        MaterialAlignment::Exact => MATERIAL_EXACT_BONUS,
        MaterialAlignment::Partial => MATERIAL_PARTIAL_BONUS,
        MaterialAlignment::None => 0,
    }
}

/// Soft/hard plastic agreement outranks the generic material bonus.
pub fn plastic_subtype_bonus(entry: &CatalogEntry, hint: Option<&str>, tables: &MatchTables) -> i32 {
    let (Some(material), Some(hint)) = (non_blank(entry.material.as_deref()), non_blank(hint))
    else {
        return 0;
    };
    let mut bonus = 0;
    if has_word(material, &tables.soft_plastic_markers) && has_word(hint, &tables.soft_plastic_markers)
    {
        bonus += PLASTIC_SUBTYPE_BONUS;
    }
    if has_word(material, &tables.hard_plastic_markers) && has_word(hint, &tables.hard_plastic_markers)
    {
        bonus += PLASTIC_SUBTYPE_BONUS;
    }
    bonus
}

pub fn clean_condition_bonus(entry: &CatalogEntry, _: Option<&str>, tables: &MatchTables) -> i32 {
    if is_clean_condition(entry, tables) {
        CLEAN_CONDITION_BONUS
    } else {
        0
    }
}

pub fn sorted_home_bonus(entry: &CatalogEntry, _: Option<&str>, tables: &MatchTables) -> i32 {
    if tables.is_residual(&entry.home_category) {
        0
    } else {
        SORTED_HOME_BONUS
    }
}

pub(crate) fn is_clean_condition(entry: &CatalogEntry, tables: &MatchTables) -> bool {
    non_blank(entry.condition.as_deref())
        .is_some_and(|condition| has_word(condition, &tables.clean_condition_markers))
}

pub fn variant_score(entry: &CatalogEntry, hint: Option<&str>, tables: &MatchTables) -> i32 {
    VARIANT_RULES
        .iter()
        .map(|(_, rule)| rule(entry, hint, tables))
        .sum()
}

/// Keep at most one hit per distinct name.
///
/// Output order follows the first appearance of each name in `hits`.
pub fn resolve(
    hits: Vec<SearchHit>,
    material_hint: Option<&str>,
    tables: &MatchTables,
    log: &DecisionLog,
) -> Vec<SearchHit> {
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<SearchHit>> = HashMap::new();
    for hit in hits {
        let key = hit.entry.name.trim().to_lowercase();
        if !groups.contains_key(&key) {
            group_order.push(key.clone());
        }
        groups.entry(key).or_default().push(hit);
    }

    let mut resolved = Vec::with_capacity(group_order.len());
    for key in group_order {
        let Some(mut group) = groups.remove(&key) else {
            continue;
        };
        if group.len() == 1 {
            resolved.extend(group);
            continue;
        }

        let variant_count = group.len();
        // sort_by_key is stable: equal scores keep hit order.
        group.sort_by_key(|hit| -variant_score(&hit.entry, material_hint, tables));
        let Some(chosen) = group.into_iter().next() else {
            continue;
        };
        log.record(
            DecisionRecord::new(
                Stage::Variants,
                format!("Chose variant of '{}' among {variant_count}", chosen.entry.name),
            )
            .with("id", chosen.entry.id)
            .with("material", chosen.entry.material.as_deref().unwrap_or("-"))
            .with("score", variant_score(&chosen.entry, material_hint, tables)),
        );
        resolved.push(chosen);
    }

    resolved
}

#[cfg(test)]
#[path = "../tests/analysis/variant_resolver_tests.rs"]
mod tests;
