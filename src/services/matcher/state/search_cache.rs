//! LRU cache in front of a `CatalogStore`.
//!
//! The catalog is read-only during a session, so successful lookups can be
//! replayed. Errors and timeouts are never cached.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use lru::LruCache;

use crate::services::matcher::analysis::normalizer::normalize_term;
use crate::services::matcher::models::types::{CatalogEntry, MatchField};
use crate::services::matcher::state::catalog_store::CatalogStore;
use crate::types::errors::EngineResult;

type CacheKey = (MatchField, String, usize);

pub struct CachedCatalogStore<S> {
    inner: S,
    cache: Mutex<LruCache<CacheKey, Vec<CatalogEntry>>>,
}

impl<S: CatalogStore> CachedCatalogStore<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached lookups (for diagnostics).
    pub fn len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl<S: CatalogStore> CatalogStore for CachedCatalogStore<S> {
    async fn query_by_field(
        &self,
        field: MatchField,
        term: &str,
        limit: usize,
    ) -> EngineResult<Vec<CatalogEntry>> {
        let key = (field, normalize_term(term), limit);

        // Guard is dropped before the await below.
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(hit) = cached {
            log::debug!("[SearchCache] hit for {} '{}'", field, key.1);
            return Ok(hit);
        }

        let rows = self.inner.query_by_field(field, term, limit).await?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key, rows.clone());
        Ok(rows)
    }
}

/// Share `store`, fronted by an LRU cache unless `capacity` is 0.
pub fn shared_store<S>(store: S, capacity: usize) -> Arc<dyn CatalogStore>
where
    S: CatalogStore + 'static,
{
    if capacity == 0 {
        Arc::new(store)
    } else {
        Arc::new(CachedCatalogStore::new(store, capacity))
    }
}

#[cfg(test)]
#[path = "../tests/state/search_cache_tests.rs"]
mod tests;
