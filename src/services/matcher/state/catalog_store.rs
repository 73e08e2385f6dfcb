use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::catalog_repo;
use crate::services::matcher::models::types::{CatalogEntry, MatchField};
use crate::types::errors::EngineResult;

/// Read-only text search over the reference catalog.
///
/// `query_by_field` returns entries whose `field` contains `term`
/// (case-insensitive), at most `limit` rows, in a stable order.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn query_by_field(
        &self,
        field: MatchField,
        term: &str,
        limit: usize,
    ) -> EngineResult<Vec<CatalogEntry>>;
}

/// Catalog backed by the `catalog_entries` SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn query_by_field(
        &self,
        field: MatchField,
        term: &str,
        limit: usize,
    ) -> EngineResult<Vec<CatalogEntry>> {
        let rows = catalog_repo::query_by_field(&self.pool, field, term, limit).await?;
        Ok(rows.into_iter().map(CatalogEntry::from).collect())
    }
}
