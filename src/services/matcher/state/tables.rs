//! Static lookup tables used by the matcher.
//!
//! Built once at startup (defaults or a JSON document) and shared read-only
//! through `Arc<MatchTables>`. Nothing in the pipeline reaches for global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::services::matcher::analysis::normalizer::eq_ci;
use crate::types::errors::{EngineError, EngineResult};

/// Label substring triggers that inject extra search terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymRule {
    pub triggers: Vec<String>,
    pub terms: Vec<String>,
}

/// Fallback terms for a label that produced no catalog hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeTerms {
    pub key: String,
    pub terms: Vec<String>,
}

/// A `{home, recycling}` category pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPair {
    pub home: String,
    pub recycling: String,
}

impl CategoryPair {
    pub fn new(home: &str, recycling: &str) -> Self {
        Self {
            home: home.to_string(),
            recycling: recycling.to_string(),
        }
    }
}

/// Material keywords mapped to a category pair. Rules are tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRule {
    pub keywords: Vec<String>,
    pub categories: CategoryPair,
}

/// Plastic categories split by sub-type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasticCategories {
    pub soft: CategoryPair,
    pub hard: CategoryPair,
    pub generic: CategoryPair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTables {
    pub synonyms: Vec<SynonymRule>,
    pub alternatives: Vec<AlternativeTerms>,
    /// Jaro-Winkler similarity at which a label token counts as an
    /// approximate match for an alternative-terms key token.
    pub alternative_similarity: f64,

    /// Hazard classes (electronics, batteries, chemicals). Checked first.
    pub hazard_rules: Vec<MaterialRule>,
    /// Non-plastic materials (metal, glass, cardboard, paper, textile, food).
    pub material_rules: Vec<MaterialRule>,
    pub plastic: PlasticCategories,
    pub residual: CategoryPair,

    pub generic_plastic_keywords: Vec<String>,
    pub soft_plastic_markers: Vec<String>,
    pub hard_plastic_markers: Vec<String>,
    /// Description words implying soft plastic (bag, film, wrap).
    pub soft_description_hints: Vec<String>,
    /// Description words implying hard plastic (bottle, container).
    pub hard_description_hints: Vec<String>,

    pub clean_condition_markers: Vec<String>,
    /// Entry names that denote a generic foil/wrap material.
    pub generic_wrap_markers: Vec<String>,
    /// Home categories considered reliably sorted.
    pub well_sorted_categories: Vec<String>,
}

fn words(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn synonym(triggers: &[&str], terms: &[&str]) -> SynonymRule {
    SynonymRule {
        triggers: words(triggers),
        terms: words(terms),
    }
}

fn alternative(key: &str, terms: &[&str]) -> AlternativeTerms {
    AlternativeTerms {
        key: key.to_string(),
        terms: words(terms),
    }
}

fn rule(keywords: &[&str], home: &str, recycling: &str) -> MaterialRule {
    MaterialRule {
        keywords: words(keywords),
        categories: CategoryPair::new(home, recycling),
    }
}

impl Default for MatchTables {
    fn default() -> Self {
        Self {
            synonyms: vec![
                synonym(
                    &["cardboard", "container", "box"],
                    &["box", "packaging", "cardboard", "carton"],
                ),
                synonym(&["bottle"], &["bottle", "plastic bottle", "glass bottle"]),
                synonym(
                    &["tin can", "soda can", "beverage can", "drink can"],
                    &["can", "tin", "metal packaging"],
                ),
                synonym(&["bag", "sack"], &["bag", "plastic bag", "carrier bag"]),
                synonym(&["wrap", "film", "cling"], &["plastic film", "cling film", "wrap"]),
                synonym(&["foil", "aluminium", "aluminum"], &["aluminium foil", "foil"]),
                synonym(&["jar", "glass"], &["glass", "jar", "glass packaging"]),
                synonym(&["newspaper", "magazine", "paper"], &["paper", "newspaper"]),
                synonym(
                    &["phone", "laptop", "computer", "charger", "cable"],
                    &["electronics", "electronic device"],
                ),
                synonym(&["battery", "batteries"], &["battery", "batteries"]),
                synonym(
                    &["shirt", "jeans", "jacket", "clothing", "sock", "shoe"],
                    &["clothing", "textile", "clothes"],
                ),
                synonym(
                    &["apple", "banana", "fruit", "vegetable", "food", "peel"],
                    &["food waste", "food", "leftovers"],
                ),
            ],
            alternatives: vec![
                alternative("tableware", &["plate", "cutlery", "dish"]),
                alternative("drinkware", &["cup", "mug", "drinking glass"]),
                alternative("packaging and labeling", &["packaging", "label"]),
                alternative("plastic wrap", &["cling film", "plastic film"]),
                alternative("pet bottle", &["plastic bottle", "bottle"]),
                alternative("mobile phone", &["phone", "smartphone"]),
                alternative("footwear", &["shoe", "shoes"]),
                alternative("paper product", &["paper", "tissue"]),
                alternative("home appliance", &["appliance", "electronics"]),
                alternative("fast food", &["takeaway box", "food packaging"]),
                alternative("carton", &["milk carton", "beverage carton"]),
                alternative("aluminium", &["aluminium foil", "can"]),
            ],
            alternative_similarity: 0.88,
            hazard_rules: vec![
                rule(
                    &["battery", "batteries", "accumulator"],
                    "Hazardous waste",
                    "Batteries",
                ),
                rule(
                    &["hazardous", "chemical", "toxic", "paint", "solvent"],
                    "Hazardous waste",
                    "Hazardous waste",
                ),
                rule(
                    &["electronic", "electrical", "e-waste"],
                    "Electronic waste",
                    "Electronic waste",
                ),
            ],
            material_rules: vec![
                rule(
                    &["metal", "steel", "aluminum", "aluminium", "iron", "tin can"],
                    "Metal",
                    "Metal",
                ),
                rule(&["glass"], "Glass", "Glass"),
                rule(&["cardboard", "carton"], "Cardboard", "Cardboard"),
                rule(&["paper"], "Paper", "Paper"),
                rule(
                    &["textile", "clothing", "fabric", "cotton", "wool"],
                    "Textile waste",
                    "Textile",
                ),
                rule(
                    &["organic", "food", "compost"],
                    "Food waste",
                    "Food waste",
                ),
            ],
            plastic: PlasticCategories {
                soft: CategoryPair::new("Plastic", "Soft plastic"),
                hard: CategoryPair::new("Plastic", "Hard plastic"),
                generic: CategoryPair::new("Plastic", "Plastic"),
            },
            residual: CategoryPair::new("Residual", "Residual"),
            generic_plastic_keywords: words(&["plastic"]),
            soft_plastic_markers: words(&["soft", "flexible"]),
            hard_plastic_markers: words(&["hard", "rigid"]),
            soft_description_hints: words(&["bag", "film", "wrap"]),
            hard_description_hints: words(&["bottle", "container"]),
            clean_condition_markers: words(&["clean", "dry"]),
            generic_wrap_markers: words(&["foil", "wrap"]),
            well_sorted_categories: words(&[
                "Metal",
                "Plastic",
                "Paper",
                "Cardboard",
                "Glass",
                "Food waste",
                "Textile waste",
            ]),
        }
    }
}

impl MatchTables {
    /// Parse tables from JSON. Missing sections keep their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let tables: MatchTables = serde_json::from_str(json)
            .map_err(|e| EngineError::Config(format!("Failed to parse match tables: {e}")))?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.alternative_similarity) {
            return Err(EngineError::Config(format!(
                "alternative_similarity must be within [0, 1], got {}",
                self.alternative_similarity
            )));
        }
        if self.residual.home.trim().is_empty() {
            return Err(EngineError::Config(
                "residual home category must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Name of the generic residual home category.
    pub fn residual_category(&self) -> &str {
        &self.residual.home
    }

    pub fn is_residual(&self, home_category: &str) -> bool {
        eq_ci(home_category, &self.residual.home)
    }

    pub fn is_well_sorted(&self, home_category: &str) -> bool {
        self.well_sorted_categories
            .iter()
            .any(|c| eq_ci(c, home_category))
    }
}

#[cfg(test)]
#[path = "../tests/state/tables_tests.rs"]
mod tests;
