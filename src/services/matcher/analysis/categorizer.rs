//! Final home/recycling categorization of the winning entry.
//!
//! Reconciles catalog categories with the AI material hint. Precedence
//! (first match wins):
//! 1. hazardous AI material, catalog material absent -> `ai-hazardous`
//! 2. precise catalog material + both categories     -> `database-precise`
//! 3. generic plastic + AI plastic sub-type          -> `ai-specific`
//! 4. both catalog categories present                -> `database`
//! 5. AI material present                            -> `ai-fallback`
//! 6. otherwise residual                             -> `fallback`

use crate::services::matcher::analysis::normalizer::{
    contains_any, has_word, has_word_prefix, non_blank,
};
use crate::services::matcher::models::types::{CategorizationResult, CategorySource};
use crate::services::matcher::state::tables::{CategoryPair, MatchTables};

#[derive(Debug, Clone, Copy, Default)]
pub struct CategorizationInput<'a> {
    pub db_material: Option<&'a str>,
    pub db_home: Option<&'a str>,
    pub db_recycling: Option<&'a str>,
    pub ai_material: Option<&'a str>,
    pub ai_description: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlasticSubtype {
    Soft,
    Hard,
}

/// Explicit soft/hard marker in a material string.
pub fn plastic_subtype(material: &str, tables: &MatchTables) -> Option<PlasticSubtype> {
    if has_word(material, &tables.soft_plastic_markers) {
        Some(PlasticSubtype::Soft)
    } else if has_word(material, &tables.hard_plastic_markers) {
        Some(PlasticSubtype::Hard)
    } else {
        None
    }
}

/// Sub-type implied by the object description (bag/film/wrap, bottle/container).
///
/// Hints must start a word, so "garbage" is not read as "bag".
pub fn description_subtype(description: &str, tables: &MatchTables) -> Option<PlasticSubtype> {
    if has_word_prefix(description, &tables.soft_description_hints) {
        Some(PlasticSubtype::Soft)
    } else if has_word_prefix(description, &tables.hard_description_hints) {
        Some(PlasticSubtype::Hard)
    } else {
        None
    }
}

pub fn is_hazardous(material: &str, tables: &MatchTables) -> bool {
    tables
        .hazard_rules
        .iter()
        .any(|rule| contains_any(material, &rule.keywords))
}

/// Carries a sub-type marker or a compound "X - Y" form.
pub fn is_precise_material(material: &str, tables: &MatchTables) -> bool {
    plastic_subtype(material, tables).is_some() || material.contains(" - ")
}

fn is_generic_plastic(material: &str, tables: &MatchTables) -> bool {
    !is_precise_material(material, tables)
        && contains_any(material, &tables.generic_plastic_keywords)
}

/// Map a material string to categories via the keyword tables.
///
/// Explicit sub-types in `material` win over description hints; description
/// hints win over the generic plastic pair. Unknown materials are residual.
pub fn classify_material(material: &str, description: &str, tables: &MatchTables) -> CategoryPair {
    if let Some(rule) = tables
        .hazard_rules
        .iter()
        .find(|rule| contains_any(material, &rule.keywords))
    {
        return rule.categories.clone();
    }

    let is_plastic = contains_any(material, &tables.generic_plastic_keywords);
    let subtype = plastic_subtype(material, tables);
    if is_plastic || subtype.is_some() {
        let subtype = subtype.or_else(|| description_subtype(description, tables));
        return match subtype {
            Some(PlasticSubtype::Soft) => tables.plastic.soft.clone(),
            Some(PlasticSubtype::Hard) => tables.plastic.hard.clone(),
            None => tables.plastic.generic.clone(),
        };
    }

    tables
        .material_rules
        .iter()
        .find(|rule| contains_any(material, &rule.keywords))
        .map(|rule| rule.categories.clone())
        .unwrap_or_else(|| tables.residual.clone())
}

fn result(pair: CategoryPair, source: CategorySource) -> CategorizationResult {
    CategorizationResult {
        home_category: pair.home,
        recycling_category: pair.recycling,
        source,
    }
}

pub fn categorize(input: &CategorizationInput<'_>, tables: &MatchTables) -> CategorizationResult {
    let db_material = non_blank(input.db_material);
    let ai_material = non_blank(input.ai_material);
    let db_categories = match (non_blank(input.db_home), non_blank(input.db_recycling)) {
        (Some(home), Some(recycling)) => Some(CategoryPair::new(home, recycling)),
        _ => None,
    };

    if let Some(ai) = ai_material {
        if db_material.is_none() && is_hazardous(ai, tables) {
            return result(
                classify_material(ai, input.ai_description, tables),
                CategorySource::AiHazardous,
            );
        }
    }

    if let Some(categories) = db_categories {
        if let Some(material) = db_material {
            if is_precise_material(material, tables) {
                return result(categories, CategorySource::DatabasePrecise);
            }
            if let Some(ai) = ai_material {
                if is_generic_plastic(material, tables) && plastic_subtype(ai, tables).is_some() {
                    return result(
                        classify_material(ai, input.ai_description, tables),
                        CategorySource::AiSpecific,
                    );
                }
            }
        }
        return result(categories, CategorySource::Database);
    }

    if let Some(ai) = ai_material {
        return result(
            classify_material(ai, input.ai_description, tables),
            CategorySource::AiFallback,
        );
    }

    result(tables.residual.clone(), CategorySource::Fallback)
}

#[cfg(test)]
#[path = "../tests/analysis/categorizer_tests.rs"]
mod tests;
