use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::services::matcher::state::master_catalog::MemoryCatalog;
use crate::types::errors::EngineError;

struct CountingStore {
    inner: MemoryCatalog,
    calls: AtomicUsize,
    fail_term: Option<&'static str>,
}

#[async_trait]
impl CatalogStore for CountingStore {
    async fn query_by_field(
        &self,
        field: MatchField,
        term: &str,
        limit: usize,
    ) -> EngineResult<Vec<CatalogEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_term == Some(term) {
            return Err(EngineError::Database("disk I/O error".to_string()));
        }
        self.inner.query_by_field(field, term, limit).await
    }
}

fn store(fail_term: Option<&'static str>) -> CountingStore {
    CountingStore {
        inner: MemoryCatalog::new(vec![CatalogEntry {
            id: 1,
            name: "Glass jar".to_string(),
            synonyms: None,
            variation: None,
            material: Some("Glass".to_string()),
            condition: None,
            home_category: "Glass".to_string(),
            recycling_category: "Glass".to_string(),
        }]),
        calls: AtomicUsize::new(0),
        fail_term,
    }
}

#[tokio::test]
async fn test_repeated_lookup_is_served_from_cache() {
    let cached = CachedCatalogStore::new(store(None), 16);

    let first = cached.query_by_field(MatchField::Name, "jar", 40).await.unwrap();
    let second = cached.query_by_field(MatchField::Name, " JAR ", 40).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cached.len(), 1);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let cached = CachedCatalogStore::new(store(Some("broken")), 16);

    assert!(cached
        .query_by_field(MatchField::Name, "broken", 40)
        .await
        .is_err());
    assert!(cached
        .query_by_field(MatchField::Name, "broken", 40)
        .await
        .is_err());

    assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    assert!(cached.is_empty());
}

#[tokio::test]
async fn test_capacity_evicts_least_recent() {
    let cached = CachedCatalogStore::new(store(None), 1);
    cached.query_by_field(MatchField::Name, "jar", 40).await.unwrap();
    cached.query_by_field(MatchField::Name, "glass", 40).await.unwrap();
    cached.query_by_field(MatchField::Name, "jar", 40).await.unwrap();

    assert_eq!(cached.len(), 1);
    assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 3);
}
