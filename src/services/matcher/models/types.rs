//! Domain types for the identification pipeline.
//!
//! Contains: CandidateLabel, CatalogEntry, MatchField, SearchHit, ScoredCandidate,
//! CategorySource, CategorizationResult, WasteIdentification.

use serde::{Deserialize, Serialize};

/// Display name of the "no match" result.
pub const NOT_FOUND_NAME: &str = "Not found in catalog";

/// One AI-produced guess at the object's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLabel {
    pub description: String,
    pub confidence: f32,
    #[serde(default)]
    pub material: Option<String>,
}

impl CandidateLabel {
    /// Build a label with its confidence clamped into `[0, 1]`.
    pub fn new(description: impl Into<String>, confidence: f32, material: Option<&str>) -> Self {
        Self {
            description: description.into(),
            confidence: clamp_confidence(confidence),
            material: material.map(|m| m.to_string()),
        }
    }

    /// Material hint, if it carries any text.
    pub fn material_hint(&self) -> Option<&str> {
        self.material
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Clamp a collaborator-provided confidence into `[0, 1]`. NaN counts as 0.
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// A single row of the reference waste-sorting catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub synonyms: Option<String>,
    #[serde(default)]
    pub variation: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub home_category: String,
    #[serde(default)]
    pub recycling_category: String,
}

/// Catalog field a search term matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchField {
    Name,
    Synonym,
    Variation,
    Material,
}

/// Fields every search term is looked up in, in lookup order.
pub const SEARCH_FIELDS: [MatchField; 3] =
    [MatchField::Name, MatchField::Synonym, MatchField::Variation];

impl MatchField {
    /// Backing column in the `catalog_entries` table.
    pub fn column(&self) -> &'static str {
        match self {
            MatchField::Name => "name",
            MatchField::Synonym => "synonyms",
            MatchField::Variation => "variation",
            MatchField::Material => "material",
        }
    }

    /// Read this field from an entry.
    pub fn value_of<'a>(&self, entry: &'a CatalogEntry) -> Option<&'a str> {
        match self {
            MatchField::Name => Some(entry.name.as_str()),
            MatchField::Synonym => entry.synonyms.as_deref(),
            MatchField::Variation => entry.variation.as_deref(),
            MatchField::Material => entry.material.as_deref(),
        }
    }
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchField::Name => write!(f, "name"),
            MatchField::Synonym => write!(f, "synonym"),
            MatchField::Variation => write!(f, "variation"),
            MatchField::Material => write!(f, "material"),
        }
    }
}

/// A catalog entry plus the provenance of the lookup that found it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub entry: CatalogEntry,
    pub match_field: MatchField,
    pub match_term: String,
}

/// Best catalog entry of one label with its comparable score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub label: CandidateLabel,
    pub entry: CatalogEntry,
    pub db_match_quality: f32,
    pub combined_score: f32,
}

/// Why a categorization was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategorySource {
    Database,
    DatabasePrecise,
    AiSpecific,
    AiFallback,
    AiHazardous,
    Fallback,
}

impl std::fmt::Display for CategorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategorySource::Database => write!(f, "database"),
            CategorySource::DatabasePrecise => write!(f, "database-precise"),
            CategorySource::AiSpecific => write!(f, "ai-specific"),
            CategorySource::AiFallback => write!(f, "ai-fallback"),
            CategorySource::AiHazardous => write!(f, "ai-hazardous"),
            CategorySource::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizationResult {
    pub home_category: String,
    pub recycling_category: String,
    pub source: CategorySource,
}

/// Final output of one identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteIdentification {
    pub name: String,
    pub home_category: String,
    pub recycling_category: String,
    pub description: String,
    pub confidence: f32,
    pub decision_log: Vec<String>,
}

impl WasteIdentification {
    /// The designated "no match" result.
    pub fn not_found(decision_log: Vec<String>) -> Self {
        Self {
            name: NOT_FOUND_NAME.to_string(),
            home_category: String::new(),
            recycling_category: String::new(),
            description: String::new(),
            confidence: 0.0,
            decision_log,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.name == NOT_FOUND_NAME
    }
}
