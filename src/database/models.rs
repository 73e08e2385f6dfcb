use serde::{Deserialize, Serialize};

use crate::services::matcher::models::types::CatalogEntry;

/// Raw `catalog_entries` row. Optional text columns may hold blanks.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub name: String,
    pub synonyms: Option<String>,
    pub variation: Option<String>,
    pub material: Option<String>,
    pub condition: Option<String>,
    pub home_category: String,
    pub recycling_category: String,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            synonyms: blank_to_none(row.synonyms),
            variation: blank_to_none(row.variation),
            material: blank_to_none(row.material),
            condition: blank_to_none(row.condition),
            home_category: row.home_category,
            recycling_category: row.recycling_category,
        }
    }
}

#[cfg(test)]
#[path = "tests/models_tests.rs"]
mod tests;
