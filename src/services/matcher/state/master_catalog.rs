use async_trait::async_trait;

use crate::services::matcher::analysis::normalizer::contains_ci;
use crate::services::matcher::models::types::{CatalogEntry, MatchField};
use crate::services::matcher::state::catalog_store::CatalogStore;
use crate::types::errors::{EngineError, EngineResult};

/// In-memory catalog, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    pub entries: Vec<CatalogEntry>,
}

impl MemoryCatalog {
    /// Entries are kept sorted by id so lookups return rows in the same
    /// order as the SQLite store.
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by_key(|entry| entry.id);
        Self { entries }
    }

    /// Load from JSON string.
    /// Supports both a bare array `[{entry1}, {entry2}]`
    /// and an object format `{"entries": [...]}`.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| EngineError::Config(format!("Failed to parse catalog JSON: {e}")))?;

        let entries: Vec<CatalogEntry> = match value {
            serde_json::Value::Object(ref map) if map.contains_key("entries") => {
                serde_json::from_value(map["entries"].clone())
                    .map_err(|e| EngineError::Config(format!("Failed to parse entries: {e}")))?
            }
            serde_json::Value::Array(_) => serde_json::from_value(value).map_err(|e| {
                EngineError::Config(format!("Failed to parse entries array: {e}"))
            })?,
            _ => {
                return Err(EngineError::Config(
                    "Invalid catalog format: expected array or object with 'entries' key"
                        .to_string(),
                ))
            }
        };

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = entries.iter().find(|entry| !seen.insert(entry.id)) {
            return Err(EngineError::Config(format!(
                "Duplicate catalog id {}",
                dup.id
            )));
        }

        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn query_by_field(
        &self,
        field: MatchField,
        term: &str,
        limit: usize,
    ) -> EngineResult<Vec<CatalogEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| {
                field
                    .value_of(entry)
                    .is_some_and(|value| contains_ci(value, term))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "../tests/state/master_catalog_tests.rs"]
mod tests;
